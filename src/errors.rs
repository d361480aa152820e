/*!
 * Error types for the capwright application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur inside the caption layout engine
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A requested font could not be located as a path or a bundled asset
    #[error("Font '{0}' not found")]
    FontNotFound(String),

    /// A font file was found but could not be loaded
    #[error("Failed to load font '{path}': {reason}")]
    FontLoad {
        /// Path to the offending font file
        path: String,
        /// Reason reported by the font parser
        reason: String,
    },

    /// Error when measuring rendered text
    #[error("Text measurement failed: {0}")]
    Measure(String),
}

/// Errors that can occur when producing a transcription
#[derive(Error, Debug)]
pub enum TranscribeError {
    /// No usable transcription backend is available
    #[error("Transcription backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Error when launching or waiting on the local whisper process
    #[error("Whisper process failed: {0}")]
    ProcessFailed(String),

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when parsing transcriber output fails
    #[error("Failed to parse transcription output: {0}")]
    ParseError(String),
}

/// Errors that can occur while rendering captions onto video
#[derive(Error, Debug)]
pub enum RenderError {
    /// ffmpeg could not be launched
    #[error("Failed to launch ffmpeg: {0}")]
    FfmpegMissing(String),

    /// ffmpeg exited with a failure status
    #[error("ffmpeg failed: {0}")]
    FfmpegFailed(String),

    /// The render was cut short before ffmpeg finished
    #[error("Render interrupted: {0}")]
    Interrupted(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the layout engine
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcribe(#[from] TranscribeError),

    /// Error from rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
