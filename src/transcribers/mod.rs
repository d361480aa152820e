/*!
 * Speech-to-text backends producing word-level timestamps.
 *
 * This module contains the transcription backends:
 * - Whisper CLI: local `whisper` executable
 * - OpenAI: transcription API integration
 * - Mock: deterministic backend for tests
 */

use async_trait::async_trait;
use log::{debug, info};
use std::fmt::Debug;
use std::path::Path;

use crate::app_config::{TranscriptionConfig, WhisperMode};
use crate::errors::TranscribeError;
use crate::transcript::Transcript;

/// Options forwarded to the transcription backend
#[derive(Debug, Clone, Default)]
pub struct TranscribeOptions {
    /// Whisper model name (local backend only)
    pub model_name: String,

    /// Spoken language as an ISO 639-1 code; `None` auto-detects
    pub language: Option<String>,

    /// Initial prompt to bias decoding
    pub initial_prompt: Option<String>,
}

impl From<&TranscriptionConfig> for TranscribeOptions {
    fn from(config: &TranscriptionConfig) -> Self {
        Self {
            model_name: config.model_name.clone(),
            language: config.language.clone(),
            initial_prompt: config.initial_prompt.clone(),
        }
    }
}

/// Common trait for all transcription backends
///
/// This trait defines the interface that all backend implementations must
/// follow, allowing them to be used interchangeably by the controller.
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe an audio file to word-timestamped segments
    ///
    /// # Arguments
    /// * `audio_path` - Path of the audio file to transcribe
    /// * `options` - Transcription options
    ///
    /// # Returns
    /// * `Result<Transcript, TranscribeError>` - The transcript or an error
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> Result<Transcript, TranscribeError>;

    /// Test whether this backend is usable in the current environment
    ///
    /// # Returns
    /// * `Result<(), TranscribeError>` - Ok if the backend is available
    async fn test_availability(&self) -> Result<(), TranscribeError>;

    /// Short backend name for logging
    fn name(&self) -> &'static str;
}

/// Select and construct a transcription backend for the given configuration.
///
/// `auto` mode probes the local whisper CLI first and falls back to the
/// OpenAI API when an API key is configured.
pub async fn create(config: &TranscriptionConfig) -> Result<Box<dyn Transcriber>, TranscribeError> {
    match config.mode {
        WhisperMode::Local => {
            let backend = whisper_cli::WhisperCli::new();
            backend.test_availability().await?;
            Ok(Box::new(backend))
        }
        WhisperMode::Api => {
            let backend = openai::OpenAiTranscriber::from_config(config)?;
            Ok(Box::new(backend))
        }
        WhisperMode::Auto => {
            let local = whisper_cli::WhisperCli::new();
            match local.test_availability().await {
                Ok(()) => {
                    info!("Using local whisper model");
                    Ok(Box::new(local))
                }
                Err(e) => {
                    debug!("Local whisper unavailable: {}", e);
                    if config.api_key.is_empty() {
                        return Err(TranscribeError::BackendUnavailable(
                            "no local whisper CLI found and no API key configured".to_string(),
                        ));
                    }
                    info!("Using OpenAI transcription API");
                    let backend = openai::OpenAiTranscriber::from_config(config)?;
                    Ok(Box::new(backend))
                }
            }
        }
    }
}

pub mod mock;
pub mod openai;
pub mod whisper_cli;
