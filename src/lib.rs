/*!
 * # Capwright - Automatic word-synced captions for video
 *
 * A Rust library for burning time-synchronized captions into video,
 * driven by word-level speech-recognition timestamps.
 *
 * ## Features
 *
 * - Extract the audio track from a video file with ffmpeg
 * - Transcribe speech to word-level timestamps:
 *   - Local whisper CLI
 *   - OpenAI transcription API
 * - Greedy caption layout: wrap words into lines that fit a pixel-width
 *   bounding box and group them into caption blocks of bounded line count
 * - Per-word highlight timing for "karaoke"-style captions
 * - Render captions back onto the video via an ASS subtitle track
 * - Optional SRT export of the segmented captions
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `layout`: The caption layout engine:
 *   - `layout::measure`: Text measurement and font resolution
 *   - `layout::wrap`: Greedy line wrapping and the fit predicate
 *   - `layout::segment`: Grouping the word stream into caption blocks
 *   - `layout::highlight`: Per-word highlight windows
 *   - `layout::cache`: Memoization of wrap results
 *   - `layout::engine`: Fragment assembly with screen geometry
 * - `transcript`: Word/segment data model, whisper JSON parsing, SRT export
 * - `transcribers`: Speech-to-text backends (whisper CLI, OpenAI API, mock)
 * - `media`: ffmpeg/ffprobe subprocess wrappers
 * - `render`: ASS generation and ffmpeg burn-in
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod layout;
pub mod media;
pub mod render;
pub mod transcribers;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, LayoutError, RenderError, TranscribeError};
pub use layout::{Caption, Fragment, LayoutEngine, WrapResult};
pub use transcript::{Transcript, TranscriptSegment, Word};
