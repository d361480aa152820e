/*!
 * Tests for the transcription backends and the transcript-to-layout handoff
 */

use std::path::Path;
use std::sync::Arc;

use capwright::app_config::{TranscriptionConfig, WhisperMode};
use capwright::errors::TranscribeError;
use capwright::layout::LayoutEngine;
use capwright::transcribers::mock::MockTranscriber;
use capwright::transcribers::{self, TranscribeOptions, Transcriber};
use capwright::transcript::{Transcript, TranscriptSegment, Word};

use crate::common::{CharWidthMeasurer, test_style};

fn sample_segments() -> Vec<TranscriptSegment> {
    vec![
        TranscriptSegment {
            text: " Hi there".to_string(),
            start: 0.0,
            end: 1.0,
            words: vec![Word::new(" Hi", 0.0, 0.5), Word::new(" there", 0.5, 1.0)],
        },
        TranscriptSegment {
            text: " everyone".to_string(),
            start: 1.0,
            end: 1.8,
            words: vec![Word::new(" everyone", 1.0, 1.8)],
        },
    ]
}

/// The mock backend returns its configured segments through the trait object
#[tokio::test]
async fn test_mock_transcriber_withSegments_shouldReturnTranscript() {
    let backend: Box<dyn Transcriber> =
        Box::new(MockTranscriber::with_segments(sample_segments()));

    backend.test_availability().await.unwrap();

    let transcript = backend
        .transcribe(Path::new("unused.wav"), &TranscribeOptions::default())
        .await
        .unwrap();

    assert_eq!(transcript.segments.len(), 2);
    assert_eq!(transcript.words().len(), 3);
}

/// A failing backend surfaces its error and counts the attempt
#[tokio::test]
async fn test_mock_transcriber_withFailingBehavior_shouldError() {
    let backend = MockTranscriber::failing();

    let result = backend
        .transcribe(Path::new("unused.wav"), &TranscribeOptions::default())
        .await;

    assert!(matches!(result, Err(TranscribeError::ProcessFailed(_))));
    assert_eq!(backend.call_count(), 1);
}

/// API mode without a key is rejected at backend construction
#[tokio::test]
async fn test_create_withApiModeAndNoKey_shouldFail() {
    let config = TranscriptionConfig {
        mode: WhisperMode::Api,
        ..TranscriptionConfig::default()
    };

    let result = transcribers::create(&config).await;
    assert!(matches!(
        result,
        Err(TranscribeError::BackendUnavailable(_))
    ));
}

/// Transcribed words flow through the layout engine end to end
#[tokio::test]
async fn test_pipeline_withMockTranscript_shouldProduceFragments() {
    let backend = MockTranscriber::with_segments(sample_segments());
    let transcript = backend
        .transcribe(Path::new("unused.wav"), &TranscribeOptions::default())
        .await
        .unwrap();

    let engine = LayoutEngine::new(
        test_style(),
        2,
        200,
        720,
        0.5,
        true,
        Arc::new(CharWidthMeasurer::new(10, 20)),
    );

    let words = transcript.words();
    let fragments = engine.layout(&words).unwrap();

    // One highlight window per word, tiling [0.0, 1.8)
    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[0].start, 0.0);
    assert_eq!(fragments[2].end, 1.8);
}

/// An empty transcript stays empty through flattening
#[tokio::test]
async fn test_mock_transcriber_withEmptyBehavior_shouldYieldNoWords() {
    let backend = MockTranscriber::empty();

    let transcript: Transcript = backend
        .transcribe(Path::new("unused.wav"), &TranscribeOptions::default())
        .await
        .unwrap();

    assert!(transcript.is_empty());
    assert!(transcript.words().is_empty());
}

/// The availability probe also works from a synchronous context
#[test]
fn test_mock_transcriber_withBlockingCaller_shouldProbeAvailability() {
    let backend = MockTranscriber::with_segments(sample_segments());

    tokio_test::block_on(backend.test_availability()).unwrap();
    assert!(tokio_test::block_on(MockTranscriber::failing().test_availability()).is_err());
}
