use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::layout::Caption;

// @module: Transcript data model and subtitle output

/// A single transcribed word with its spoken time interval.
///
/// Produced by the transcription backend and never mutated afterwards.
/// `start` is non-decreasing across the word stream of a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    /// Word text; whisper emits a leading space which is trimmed on access
    #[serde(rename = "word")]
    pub text: String,

    /// Start of the spoken interval in seconds
    pub start: f64,

    /// End of the spoken interval in seconds
    pub end: f64,
}

impl Word {
    /// Creates a new word - used by tests and external consumers
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Word {
            text: text.into(),
            start,
            end,
        }
    }

    // @creates: Validated word
    // @validates: Time interval and non-empty text
    pub fn new_validated(text: impl Into<String>, start: f64, end: f64) -> Result<Self> {
        let text = text.into();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(anyhow!("Empty word text at {:.3}s", start));
        }

        if end < start {
            return Err(anyhow!(
                "Invalid word interval: end {:.3} < start {:.3}",
                end,
                start
            ));
        }

        Ok(Word {
            text: trimmed.to_string(),
            start,
            end,
        })
    }
}

/// One provisional segment as grouped by the transcriber.
///
/// The layout engine re-segments the flattened word stream on its own;
/// this grouping is only kept for diagnostics and SRT fallback timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment text as emitted by the transcriber
    pub text: String,

    /// Start of the segment in seconds
    pub start: f64,

    /// End of the segment in seconds
    pub end: f64,

    /// Word-level timestamps within the segment
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Raw whisper JSON document shape
#[derive(Debug, Deserialize)]
struct WhisperDocument {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
}

/// A full transcription result: provisional segments plus detected language
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Detected or requested language, if the backend reported one
    pub language: Option<String>,

    /// Provisional segments in time order
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Create a transcript from already-built segments
    pub fn from_segments(language: Option<String>, segments: Vec<TranscriptSegment>) -> Self {
        Transcript { language, segments }
    }

    /// Parse the JSON document written by the whisper CLI
    /// (`--output_format json --word_timestamps True`)
    pub fn from_whisper_json(content: &str) -> Result<Self> {
        let doc: WhisperDocument =
            serde_json::from_str(content).context("Failed to parse whisper JSON output")?;

        Ok(Transcript {
            language: doc.language,
            segments: doc.segments,
        })
    }

    /// Flatten the segments into a clean, time-ordered word stream.
    ///
    /// Whisper pads word texts with leading spaces and occasionally emits
    /// zero-length or backwards intervals at segment boundaries; both are
    /// repaired here so downstream layout can rely on the invariants.
    pub fn words(&self) -> Vec<Word> {
        let mut words = Vec::new();
        let mut dropped = 0usize;
        let mut last_start = f64::NEG_INFINITY;

        for segment in &self.segments {
            for word in &segment.words {
                match Word::new_validated(word.text.clone(), word.start, word.end) {
                    Ok(mut clean) => {
                        // Clamp occasional backwards starts so the stream stays ordered
                        if clean.start < last_start {
                            debug!(
                                "Clamping out-of-order word '{}' from {:.3}s to {:.3}s",
                                clean.text, clean.start, last_start
                            );
                            clean.start = last_start;
                            if clean.end < clean.start {
                                clean.end = clean.start;
                            }
                        }
                        last_start = clean.start;
                        words.push(clean);
                    }
                    Err(e) => {
                        debug!("Dropping invalid word: {}", e);
                        dropped += 1;
                    }
                }
            }
        }

        if dropped > 0 {
            warn!("Dropped {} invalid word(s) from the transcript", dropped);
        }

        words
    }

    /// Full transcript text, segment texts joined by spaces
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the transcript contains any usable words
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.words.is_empty())
    }
}

/// One SRT entry derived from a caption block
#[derive(Debug, Clone)]
pub struct SrtEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Entry text
    pub text: String,
}

impl SrtEntry {
    /// Parse an SRT timestamp to milliseconds - used by tests
    #[allow(dead_code)]
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SrtEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Convert caption blocks into SRT entries
pub fn captions_to_srt(captions: &[Caption]) -> Vec<SrtEntry> {
    captions
        .iter()
        .enumerate()
        .map(|(i, caption)| SrtEntry {
            seq_num: i + 1,
            start_time_ms: seconds_to_ms(caption.start),
            end_time_ms: seconds_to_ms(caption.end),
            text: caption.text.clone(),
        })
        .collect()
}

/// Write caption blocks to an SRT file
pub fn write_srt<P: AsRef<Path>>(captions: &[Caption], path: P) -> Result<()> {
    let path = path.as_ref();

    let mut content = String::new();
    for entry in captions_to_srt(captions) {
        fmt::write(&mut content, format_args!("{}", entry))
            .context("Failed to format SRT entry")?;
    }

    crate::file_utils::FileManager::write_to_file(path, &content)
        .with_context(|| format!("Failed to write SRT file: {}", path.display()))?;

    debug!("Wrote {} SRT entries to {}", captions.len(), path.display());
    Ok(())
}

fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}
