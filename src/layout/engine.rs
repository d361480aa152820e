use std::sync::Arc;

use log::debug;

use crate::app_config::StyleConfig;
use crate::errors::LayoutError;
use crate::transcript::Word;

use super::cache::{LayoutCache, WrapKey};
use super::highlight::HighlightTimeline;
use super::measure::{TextMeasurer, TextStyle};
use super::segment::{Caption, CaptionSegmenter};
use super::wrap::{FitPredicate, LineWrapper, WrapResult};

// @module: Fragment assembly with screen geometry

/// A time-bounded, geometrically-resolved caption unit ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Full wrapped caption text
    pub text: String,

    /// Window start in seconds (inclusive)
    pub start: f64,

    /// Window end in seconds (exclusive)
    pub end: f64,

    /// Wrapped lines and their pixel heights
    pub wrap: WrapResult,

    /// Word slot drawn in the highlight color, if highlighting is on
    pub highlighted_word_index: Option<usize>,

    /// Vertical pixel offset of the caption block's top edge
    pub y_offset: i32,
}

/// Ties the layout stages together: segmentation, highlight expansion and
/// cached geometry, producing the fragment sequence handed to the renderer.
pub struct LayoutEngine {
    /// Measurement style shared by every stage
    style: TextStyle,

    /// Maximum lines per caption
    line_count: usize,

    /// Caption bounding box width in pixels
    frame_width: u32,

    /// Video frame height in pixels, for the vertical anchor
    video_height: u32,

    /// Vertical anchor, fraction of the frame height up from the bottom
    rel_height_pos: f64,

    /// Emit one fragment per spoken word instead of one per caption
    highlight_current_word: bool,

    /// Injected text measurer
    measurer: Arc<dyn TextMeasurer>,

    /// Per-run wrap cache
    cache: LayoutCache,
}

impl LayoutEngine {
    /// Build an engine from the style configuration and the probed video
    /// dimensions. `font` must already be resolved to a file on disk.
    pub fn from_config(
        config: &StyleConfig,
        font: std::path::PathBuf,
        video_width: u32,
        video_height: u32,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Self {
        let style = TextStyle {
            font,
            font_size: config.font_size,
            stroke_width: config.stroke_width,
        };
        let frame_width = (video_width as f64 * config.rel_width) as u32;

        Self::new(
            style,
            config.line_count,
            frame_width,
            video_height,
            config.rel_height_pos,
            config.highlight_current_word,
            measurer,
        )
    }

    /// Build an engine from explicit layout constraints
    pub fn new(
        style: TextStyle,
        line_count: usize,
        frame_width: u32,
        video_height: u32,
        rel_height_pos: f64,
        highlight_current_word: bool,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Self {
        Self {
            style,
            line_count,
            frame_width,
            video_height,
            rel_height_pos,
            highlight_current_word,
            measurer,
            cache: LayoutCache::new(),
        }
    }

    /// Group the word stream into caption blocks
    pub fn segment_captions(&self, words: &[Word]) -> Result<Vec<Caption>, LayoutError> {
        let fits = FitPredicate::new(
            self.line_count,
            self.style.clone(),
            self.frame_width,
            Arc::clone(&self.measurer),
            self.cache.clone(),
        );

        CaptionSegmenter::segment(words, &fits)
    }

    /// Full layout pass: words to render-ready fragments.
    ///
    /// Fails on the first error; no partial fragment sequence is returned.
    pub fn layout(&self, words: &[Word]) -> Result<Vec<Fragment>, LayoutError> {
        let captions = self.segment_captions(words)?;
        self.fragments_for(&captions)
    }

    /// Expand caption blocks into fragments with resolved geometry.
    ///
    /// Geometry is computed once per caption and reused across all of its
    /// highlight windows through the wrap cache.
    pub fn fragments_for(&self, captions: &[Caption]) -> Result<Vec<Fragment>, LayoutError> {
        let mut fragments = Vec::new();

        for caption in captions {
            let key = WrapKey::new(&caption.text, &self.style, self.frame_width);
            let wrap = self.cache.get_or_compute(key, || {
                LineWrapper::wrap(
                    &caption.text,
                    &self.style,
                    self.frame_width,
                    self.measurer.as_ref(),
                )
            })?;

            // Block center sits at video_height * (1 - rel_height_pos)
            let y_offset = (self.video_height as f64 * (1.0 - self.rel_height_pos)
                - wrap.total_height as f64 / 2.0)
                .round() as i32;

            for window in HighlightTimeline::expand(caption, self.highlight_current_word) {
                fragments.push(Fragment {
                    text: caption.text.clone(),
                    start: window.start,
                    end: window.end,
                    wrap: wrap.clone(),
                    highlighted_word_index: window.highlighted_word_index,
                    y_offset,
                });
            }
        }

        let (hits, misses, hit_rate) = self.cache.stats();
        debug!(
            "Layout produced {} fragment(s) from {} caption(s) (cache: {} hits / {} misses, {:.0}% hit rate)",
            fragments.len(),
            captions.len(),
            hits,
            misses,
            hit_rate * 100.0
        );

        Ok(fragments)
    }

    /// The wrap cache backing this engine
    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Caption bounding box width in pixels
    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }
}
