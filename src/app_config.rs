use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Caption style settings
    #[serde(default)]
    pub style: StyleConfig,

    /// Transcription settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Render settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Caption style configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StyleConfig {
    /// Font file, either an absolute path or the name of a bundled font
    #[serde(default = "default_font")]
    pub font: String,

    /// Font size in pixels
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Fill color of the caption text
    #[serde(default = "default_font_color")]
    pub font_color: String,

    /// Outline stroke width in pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,

    /// Outline stroke color
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,

    /// Highlight the word currently being spoken
    #[serde(default = "default_highlight_current_word")]
    pub highlight_current_word: bool,

    /// Color of the highlighted word
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,

    /// Maximum number of lines per caption block
    #[serde(default = "default_line_count")]
    pub line_count: usize,

    /// Caption bounding box width relative to the video width (0..=1)
    #[serde(default = "default_rel_width")]
    pub rel_width: f64,

    /// Vertical position of the caption block, measured up from the
    /// bottom of the frame as a fraction of the video height (0..=1)
    #[serde(default = "default_rel_height_pos")]
    pub rel_height_pos: f64,

    /// Shadow strength; 0 disables the shadow
    #[serde(default = "default_shadow_strength")]
    pub shadow_strength: f64,

    /// Shadow blur as a fraction of the font size
    #[serde(default = "default_shadow_blur")]
    pub shadow_blur: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font: default_font(),
            font_size: default_font_size(),
            font_color: default_font_color(),
            stroke_width: default_stroke_width(),
            stroke_color: default_stroke_color(),
            highlight_current_word: default_highlight_current_word(),
            highlight_color: default_highlight_color(),
            line_count: default_line_count(),
            rel_width: default_rel_width(),
            rel_height_pos: default_rel_height_pos(),
            shadow_strength: default_shadow_strength(),
            shadow_blur: default_shadow_blur(),
        }
    }
}

/// Transcription backend selection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WhisperMode {
    // @mode: Probe the local whisper CLI, fall back to the API
    #[default]
    Auto,
    // @mode: Local whisper CLI only
    Local,
    // @mode: OpenAI transcription API only
    Api,
}

impl WhisperMode {
    // @returns: Lowercase mode identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Auto => "auto".to_string(),
            Self::Local => "local".to_string(),
            Self::Api => "api".to_string(),
        }
    }
}

// Implement Display trait for WhisperMode
impl std::fmt::Display for WhisperMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for WhisperMode
impl std::str::FromStr for WhisperMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "local" => Ok(Self::Local),
            "api" => Ok(Self::Api),
            _ => Err(anyhow!("Invalid whisper mode: {}", s)),
        }
    }
}

/// Transcription configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Backend selection mode
    #[serde(default)]
    pub mode: WhisperMode,

    /// Whisper model name (e.g. "tiny", "base", "small")
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Spoken language as an ISO 639-1 code; omit for auto-detection
    #[serde(default)]
    pub language: Option<String>,

    /// Initial prompt passed to the model to bias decoding
    #[serde(default)]
    pub initial_prompt: Option<String>,

    /// API key for the OpenAI backend
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL for the OpenAI backend
    #[serde(default = "default_api_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            mode: WhisperMode::default(),
            model_name: default_model_name(),
            language: None,
            initial_prompt: None,
            api_key: String::new(),
            endpoint: default_api_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Render configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Output video codec
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Constant rate factor for the encoder
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// Also write the segmented captions as an SRT file
    #[serde(default)]
    pub export_srt: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            video_codec: default_video_codec(),
            crf: default_crf(),
            export_srt: false,
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            transcription: TranscriptionConfig::default(),
            render: RenderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.style.line_count == 0 {
            return Err(anyhow!("line_count must be at least 1"));
        }

        if self.style.font_size == 0 {
            return Err(anyhow!("font_size must be greater than 0"));
        }

        if !(self.style.rel_width > 0.0 && self.style.rel_width <= 1.0) {
            return Err(anyhow!(
                "rel_width must be within (0, 1], got {}",
                self.style.rel_width
            ));
        }

        if !(self.style.rel_height_pos > 0.0 && self.style.rel_height_pos <= 1.0) {
            return Err(anyhow!(
                "rel_height_pos must be within (0, 1], got {}",
                self.style.rel_height_pos
            ));
        }

        if self.style.shadow_strength < 0.0 {
            return Err(anyhow!("shadow_strength must not be negative"));
        }

        if self.style.shadow_blur < 0.0 {
            return Err(anyhow!("shadow_blur must not be negative"));
        }

        if self.style.font.is_empty() {
            return Err(anyhow!("font must not be empty"));
        }

        // Language codes are passed straight to the transcriber, catch typos here
        if let Some(language) = &self.transcription.language {
            if isolang::Language::from_639_1(language).is_none() {
                return Err(anyhow!(
                    "Unknown language code '{}': expected an ISO 639-1 code like 'en'",
                    language
                ));
            }
        }

        if !self.transcription.endpoint.is_empty() {
            url::Url::parse(&self.transcription.endpoint).map_err(|e| {
                anyhow!(
                    "Invalid transcription endpoint '{}': {}",
                    self.transcription.endpoint,
                    e
                )
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde

fn default_font() -> String {
    "Bangers-Regular.ttf".to_string()
}

fn default_font_size() -> u32 {
    100
}

fn default_font_color() -> String {
    "white".to_string()
}

fn default_stroke_width() -> u32 {
    3
}

fn default_stroke_color() -> String {
    "black".to_string()
}

fn default_highlight_current_word() -> bool {
    true
}

fn default_highlight_color() -> String {
    "yellow".to_string()
}

fn default_line_count() -> usize {
    2
}

fn default_rel_width() -> f64 {
    0.6
}

fn default_rel_height_pos() -> f64 {
    0.5
}

fn default_shadow_strength() -> f64 {
    1.0
}

fn default_shadow_blur() -> f64 {
    0.1
}

fn default_model_name() -> String {
    "base".to_string()
}

fn default_api_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_crf() -> u32 {
    18
}
