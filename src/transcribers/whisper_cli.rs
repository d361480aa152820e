use std::path::Path;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use crate::errors::TranscribeError;
use crate::transcript::Transcript;

use super::{TranscribeOptions, Transcriber};

// @module: Local whisper CLI backend

/// Availability probe timeout
const PROBE_TIMEOUT_SECS: u64 = 15;

/// Transcription timeout; large models on CPU are slow
const TRANSCRIBE_TIMEOUT_SECS: u64 = 3600;

/// Backend shelling out to the `whisper` command-line tool with JSON
/// output and word timestamps enabled.
#[derive(Debug)]
pub struct WhisperCli {
    /// Executable name or path
    executable: String,
}

impl WhisperCli {
    /// Create a backend using the `whisper` executable from PATH
    pub fn new() -> Self {
        Self {
            executable: "whisper".to_string(),
        }
    }

    /// Create a backend using a specific executable
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for WhisperCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> Result<Transcript, TranscribeError> {
        if !audio_path.exists() {
            return Err(TranscribeError::ProcessFailed(format!(
                "audio file does not exist: {:?}",
                audio_path
            )));
        }

        // The CLI writes <stem>.json into the output directory
        let output_dir = tempfile::tempdir()
            .map_err(|e| TranscribeError::ProcessFailed(format!("temp dir: {}", e)))?;

        let mut command = Command::new(&self.executable);
        command.args([
            audio_path.to_str().unwrap_or_default(),
            "--model",
            &options.model_name,
            "--output_format",
            "json",
            "--output_dir",
            output_dir.path().to_str().unwrap_or_default(),
            "--word_timestamps",
            "True",
        ]);

        if let Some(language) = &options.language {
            command.args(["--language", language]);
        }

        if let Some(prompt) = &options.initial_prompt {
            command.args(["--initial_prompt", prompt]);
        }

        debug!(
            "Running {} on {:?} (model {})",
            self.executable, audio_path, options.model_name
        );

        let timeout_duration = std::time::Duration::from_secs(TRANSCRIBE_TIMEOUT_SECS);
        let output = tokio::select! {
            result = command.output() => {
                result.map_err(|e| TranscribeError::ProcessFailed(format!(
                    "failed to launch {}: {}", self.executable, e
                )))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(TranscribeError::ProcessFailed(format!(
                    "whisper timed out after {} seconds", TRANSCRIBE_TIMEOUT_SECS
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscribeError::ProcessFailed(format!(
                "whisper exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let json_path = output_dir.path().join(format!("{}.json", stem));

        let content = std::fs::read_to_string(&json_path).map_err(|e| {
            TranscribeError::ParseError(format!(
                "whisper produced no JSON at {:?}: {}",
                json_path, e
            ))
        })?;

        let transcript = Transcript::from_whisper_json(&content)
            .map_err(|e| TranscribeError::ParseError(e.to_string()))?;

        if transcript.is_empty() {
            warn!("Whisper produced no word timestamps for {:?}", audio_path);
        }

        Ok(transcript)
    }

    async fn test_availability(&self) -> Result<(), TranscribeError> {
        let probe = Command::new(&self.executable).arg("--help").output();

        let timeout_duration = std::time::Duration::from_secs(PROBE_TIMEOUT_SECS);
        let output = tokio::select! {
            result = probe => {
                result.map_err(|e| TranscribeError::BackendUnavailable(format!(
                    "'{}' not runnable: {}", self.executable, e
                )))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(TranscribeError::BackendUnavailable(format!(
                    "'{} --help' timed out", self.executable
                )));
            }
        };

        if output.status.success() {
            Ok(())
        } else {
            Err(TranscribeError::BackendUnavailable(format!(
                "'{} --help' exited with {}",
                self.executable, output.status
            )))
        }
    }

    fn name(&self) -> &'static str {
        "whisper-cli"
    }
}
