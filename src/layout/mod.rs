/*!
 * The caption layout engine.
 *
 * Converts a flat, time-ordered stream of transcribed words into
 * screen-ready caption fragments: wrapped text that fits a pixel-width
 * bounding box with a bounded line count, plus a precise on-screen time
 * window per fragment (optionally one window per highlighted word).
 *
 * The engine is a pure transformation over immutable inputs; the only
 * shared state is the [`cache::LayoutCache`], which memoizes wrap results
 * for the duration of one run.
 */

pub mod cache;
pub mod engine;
pub mod highlight;
pub mod measure;
pub mod segment;
pub mod wrap;

// Re-export the engine surface
pub use cache::{LayoutCache, WrapKey};
pub use engine::{Fragment, LayoutEngine};
pub use highlight::{CaptionWindow, HighlightTimeline};
pub use measure::{FontMeasurer, TextMeasurer, TextStyle, resolve_font};
pub use segment::{Caption, CaptionSegmenter};
pub use wrap::{FitPredicate, Line, LineWrapper, WrapResult};
