use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, multipart};
use serde::Deserialize;

use crate::app_config::TranscriptionConfig;
use crate::errors::TranscribeError;
use crate::transcript::{Transcript, TranscriptSegment, Word};

use super::{TranscribeOptions, Transcriber};

// @module: OpenAI transcription API backend

/// API model used for transcription requests
const API_MODEL: &str = "whisper-1";

/// Word-level timestamp in the API response
#[derive(Debug, Deserialize)]
struct ApiWord {
    word: String,
    start: f64,
    end: f64,
}

/// Segment in the API response
#[derive(Debug, Deserialize)]
struct ApiSegment {
    text: String,
    start: f64,
    end: f64,
}

/// `verbose_json` transcription response
#[derive(Debug, Deserialize)]
struct ApiTranscription {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    segments: Vec<ApiSegment>,
    #[serde(default)]
    words: Vec<ApiWord>,
}

/// Error payload returned by the API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI transcription client
#[derive(Debug)]
pub struct OpenAiTranscriber {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
}

impl OpenAiTranscriber {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Build a client from the transcription configuration
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self, TranscribeError> {
        if config.api_key.is_empty() {
            return Err(TranscribeError::BackendUnavailable(
                "OpenAI API key is not configured".to_string(),
            ));
        }

        Ok(Self::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            config.timeout_secs,
        ))
    }

    fn request_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.openai.com/v1/audio/transcriptions".to_string()
        } else {
            format!(
                "{}/v1/audio/transcriptions",
                self.endpoint.trim_end_matches('/')
            )
        }
    }

    /// Distribute top-level API words into the provisional segments.
    ///
    /// The API reports word timestamps in one flat list; segments keep
    /// their own time ranges. A word belongs to the last segment whose
    /// start is not after the word's start.
    fn assemble(api: ApiTranscription) -> Transcript {
        let words: Vec<Word> = api
            .words
            .into_iter()
            .map(|w| Word::new(w.word, w.start, w.end))
            .collect();

        if api.segments.is_empty() {
            // Degenerate response: one segment spanning all the words
            let start = words.first().map(|w| w.start).unwrap_or(0.0);
            let end = words.last().map(|w| w.end).unwrap_or(start);
            let segment = TranscriptSegment {
                text: api.text,
                start,
                end,
                words,
            };
            return Transcript::from_segments(api.language, vec![segment]);
        }

        let mut segments: Vec<TranscriptSegment> = api
            .segments
            .into_iter()
            .map(|s| TranscriptSegment {
                text: s.text,
                start: s.start,
                end: s.end,
                words: Vec::new(),
            })
            .collect();

        for word in words {
            let slot = segments
                .iter()
                .rposition(|s| s.start <= word.start)
                .unwrap_or(0);
            segments[slot].words.push(word);
        }

        Transcript::from_segments(api.language, segments)
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> Result<Transcript, TranscribeError> {
        let audio = tokio::fs::read(audio_path).await.map_err(|e| {
            TranscribeError::RequestFailed(format!("failed to read {:?}: {}", audio_path, e))
        })?;

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        let file_part = multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("model", API_MODEL)
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word")
            .text("timestamp_granularities[]", "segment");

        if let Some(language) = &options.language {
            form = form.text("language", language.clone());
        }

        if let Some(prompt) = &options.initial_prompt {
            form = form.text("prompt", prompt.clone());
        }

        debug!("Uploading {:?} for transcription", audio_path);

        let response = self
            .client
            .post(self.request_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);

            error!("Transcription API error {}: {}", status, message);
            return Err(TranscribeError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let api: ApiTranscription = response
            .json()
            .await
            .map_err(|e| TranscribeError::ParseError(e.to_string()))?;

        Ok(Self::assemble(api))
    }

    async fn test_availability(&self) -> Result<(), TranscribeError> {
        if self.api_key.is_empty() {
            return Err(TranscribeError::BackendUnavailable(
                "OpenAI API key is not configured".to_string(),
            ));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
