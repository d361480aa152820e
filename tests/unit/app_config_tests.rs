/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use capwright::app_config::{Config, LogLevel, WhisperMode};

/// Defaults mirror the documented CLI defaults
#[test]
fn test_config_default_withNoInput_shouldMatchDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.style.font, "Bangers-Regular.ttf");
    assert_eq!(config.style.font_size, 100);
    assert_eq!(config.style.font_color, "white");
    assert_eq!(config.style.stroke_width, 3);
    assert_eq!(config.style.stroke_color, "black");
    assert!(config.style.highlight_current_word);
    assert_eq!(config.style.highlight_color, "yellow");
    assert_eq!(config.style.line_count, 2);
    assert_eq!(config.style.rel_width, 0.6);
    assert_eq!(config.style.rel_height_pos, 0.5);
    assert_eq!(config.style.shadow_strength, 1.0);
    assert_eq!(config.style.shadow_blur, 0.1);

    assert_eq!(config.transcription.mode, WhisperMode::Auto);
    assert_eq!(config.transcription.model_name, "base");
    assert!(config.transcription.language.is_none());
    assert!(config.transcription.api_key.is_empty());

    assert_eq!(config.render.video_codec, "libx264");
    assert!(!config.render.export_srt);

    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// A default config survives a JSON round trip
#[test]
fn test_config_serde_withRoundTrip_shouldPreserveValues() {
    let config = Config::default();

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.style.font, config.style.font);
    assert_eq!(parsed.style.line_count, config.style.line_count);
    assert_eq!(parsed.transcription.mode, config.transcription.mode);
    assert_eq!(parsed.log_level, config.log_level);
}

/// Every field has a serde default, so an empty document parses
#[test]
fn test_config_serde_withEmptyJson_shouldUseDefaults() {
    let parsed: Config = serde_json::from_str("{}").unwrap();

    assert_eq!(parsed.style.font_size, 100);
    assert_eq!(parsed.style.line_count, 2);
    assert_eq!(parsed.transcription.model_name, "base");
}

/// Partial documents override only what they name
#[test]
fn test_config_serde_withPartialJson_shouldOverrideNamedFields() {
    let json = r#"{
        "style": { "line_count": 1, "highlight_color": "red" },
        "transcription": { "mode": "local", "language": "en" }
    }"#;

    let parsed: Config = serde_json::from_str(json).unwrap();

    assert_eq!(parsed.style.line_count, 1);
    assert_eq!(parsed.style.highlight_color, "red");
    assert_eq!(parsed.style.font_size, 100);
    assert_eq!(parsed.transcription.mode, WhisperMode::Local);
    assert_eq!(parsed.transcription.language.as_deref(), Some("en"));
    assert!(parsed.validate().is_ok());
}

/// Validation rejects out-of-range layout values
#[test]
fn test_config_validate_withBadValues_shouldFail() {
    let mut config = Config::default();
    config.style.line_count = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.style.rel_width = 0.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.style.rel_width = 1.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.style.rel_height_pos = -0.1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.style.font_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.style.font = String::new();
    assert!(config.validate().is_err());
}

/// Validation rejects unknown language codes and bad endpoints
#[test]
fn test_config_validate_withBadTranscription_shouldFail() {
    let mut config = Config::default();
    config.transcription.language = Some("english".to_string());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.transcription.language = Some("en".to_string());
    assert!(config.validate().is_ok());

    let mut config = Config::default();
    config.transcription.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

/// WhisperMode string conversions
#[test]
fn test_whisper_mode_withStrings_shouldRoundTrip() {
    assert_eq!(WhisperMode::from_str("auto").unwrap(), WhisperMode::Auto);
    assert_eq!(WhisperMode::from_str("Local").unwrap(), WhisperMode::Local);
    assert_eq!(WhisperMode::from_str("API").unwrap(), WhisperMode::Api);
    assert!(WhisperMode::from_str("cloud").is_err());

    assert_eq!(WhisperMode::Auto.to_string(), "auto");
    assert_eq!(WhisperMode::Api.to_string(), "api");
}
