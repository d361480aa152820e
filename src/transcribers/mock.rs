/*!
 * Mock transcriber for testing.
 *
 * This module provides a mock backend that simulates different behaviors:
 * - `MockTranscriber::with_segments(...)` - Always succeeds with fixed segments
 * - `MockTranscriber::failing()` - Always fails with an error
 */

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::errors::TranscribeError;
use crate::transcript::{Transcript, TranscriptSegment};

use super::{TranscribeOptions, Transcriber};

/// Behavior mode for the mock transcriber
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with the configured segments
    Working,
    /// Always fails with an error
    Failing,
    /// Returns an empty transcript
    Empty,
}

/// Mock transcription backend for tests
#[derive(Debug)]
pub struct MockTranscriber {
    /// Behavior mode
    behavior: MockBehavior,
    /// Segments returned in Working mode
    segments: Vec<TranscriptSegment>,
    /// Reported language
    language: Option<String>,
    /// Number of transcribe calls observed
    call_count: Arc<AtomicUsize>,
}

impl MockTranscriber {
    /// Create a working mock returning the given segments
    pub fn with_segments(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            behavior: MockBehavior::Working,
            segments,
            language: Some("en".to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always fails
    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Failing,
            segments: Vec::new(),
            language: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock returning an empty transcript
    pub fn empty() -> Self {
        Self {
            behavior: MockBehavior::Empty,
            segments: Vec::new(),
            language: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of transcribe calls made against this mock
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        _audio_path: &Path,
        _options: &TranscribeOptions,
    ) -> Result<Transcript, TranscribeError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(Transcript::from_segments(
                self.language.clone(),
                self.segments.clone(),
            )),
            MockBehavior::Failing => Err(TranscribeError::ProcessFailed(
                "mock transcriber configured to fail".to_string(),
            )),
            MockBehavior::Empty => Ok(Transcript::default()),
        }
    }

    async fn test_availability(&self) -> Result<(), TranscribeError> {
        match self.behavior {
            MockBehavior::Failing => Err(TranscribeError::BackendUnavailable(
                "mock transcriber configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
