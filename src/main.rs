// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, WhisperMode};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod layout;
mod media;
mod render;
mod transcribers;
mod transcript;

/// CLI Wrapper for WhisperMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliWhisperMode {
    Auto,
    Local,
    Api,
}

impl From<CliWhisperMode> for WhisperMode {
    fn from(cli_mode: CliWhisperMode) -> Self {
        match cli_mode {
            CliWhisperMode::Auto => WhisperMode::Auto,
            CliWhisperMode::Local => WhisperMode::Local,
            CliWhisperMode::Api => WhisperMode::Api,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add word-synced captions to a video (default command)
    #[command(alias = "add")]
    Caption(CaptionArgs),

    /// Generate shell completions for capwright
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct CaptionArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output video file (single-file mode only)
    #[arg(value_name = "OUTPUT_PATH")]
    output_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Font file path or bundled font name
    #[arg(long)]
    font: Option<String>,

    /// Font size in pixels
    #[arg(long)]
    font_size: Option<u32>,

    /// Caption text color
    #[arg(long)]
    font_color: Option<String>,

    /// Outline stroke width in pixels
    #[arg(long)]
    stroke_width: Option<u32>,

    /// Outline stroke color
    #[arg(long)]
    stroke_color: Option<String>,

    /// Highlight the word currently being spoken
    #[arg(long)]
    highlight_current_word: Option<bool>,

    /// Color of the highlighted word
    #[arg(long)]
    highlight_color: Option<String>,

    /// Maximum number of lines per caption
    #[arg(long)]
    line_count: Option<usize>,

    /// Caption width relative to the video width (0..1]
    #[arg(long)]
    rel_width: Option<f64>,

    /// Caption vertical position, fraction of the height up from the bottom
    #[arg(long)]
    rel_height_pos: Option<f64>,

    /// Shadow strength; 0 disables the shadow
    #[arg(long)]
    shadow_strength: Option<f64>,

    /// Shadow blur as a fraction of the font size
    #[arg(long)]
    shadow_blur: Option<f64>,

    /// Whisper model name (local backend)
    #[arg(short, long)]
    model_name: Option<String>,

    /// Spoken language code (e.g. 'en', 'es', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Initial prompt passed to the transcriber
    #[arg(long)]
    initial_prompt: Option<String>,

    /// Transcription backend to use
    #[arg(short = 'w', long, value_enum)]
    use_local_whisper: Option<CliWhisperMode>,

    /// Also export the captions as an SRT file
    #[arg(short, long)]
    export_srt: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Capwright - automatic word-synced captions for video
///
/// Extracts audio, transcribes it to word-level timestamps and burns
/// time-synchronized captions back into the video.
#[derive(Parser, Debug)]
#[command(name = "capwright")]
#[command(author = "Capwright contributors")]
#[command(version = "1.0.0")]
#[command(about = "Add automatic word-synced captions to videos")]
#[command(long_about = "Capwright extracts audio from a video, transcribes it with whisper and
burns word-synced captions into the video.

EXAMPLES:
    capwright video.mp4                          # Caption using default config
    capwright video.mp4 out.mp4                  # Explicit output path
    capwright -f video.mp4                       # Force overwrite existing files
    capwright -m small -l en video.mp4           # Pick whisper model and language
    capwright --line-count 1 video.mp4           # Single-line captions
    capwright --highlight-current-word false video.mp4
    capwright -e video.mp4                       # Also export captions as SRT
    capwright --log-level debug /videos/         # Process a directory with debug logging
    capwright completions bash > capwright.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

TRANSCRIPTION BACKENDS:
    auto   - Use the local whisper CLI when available, else the OpenAI API
    local  - Local whisper CLI only
    api    - OpenAI transcription API (requires API key in the config)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    caption: CaptionArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "capwright", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Caption(args)) => run_caption(args).await,
        // Default behavior - use top-level args for ergonomic invocation
        None => run_caption(cli.caption).await,
    }
}

async fn run_caption(options: CaptionArgs) -> Result<()> {
    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required"))?;

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    apply_cli_overrides(&mut config, &options);

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file or directory
    if input_path.is_file() {
        controller
            .run(
                input_path,
                options.output_path.clone(),
                options.force_overwrite,
            )
            .await
    } else if input_path.is_dir() {
        if options.output_path.is_some() {
            return Err(anyhow!(
                "OUTPUT_PATH cannot be combined with a directory input"
            ));
        }
        controller
            .run_folder(input_path, options.force_overwrite)
            .await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", input_path))
    }
}

fn apply_cli_overrides(config: &mut Config, options: &CaptionArgs) {
    if let Some(font) = &options.font {
        config.style.font = font.clone();
    }
    if let Some(font_size) = options.font_size {
        config.style.font_size = font_size;
    }
    if let Some(font_color) = &options.font_color {
        config.style.font_color = font_color.clone();
    }
    if let Some(stroke_width) = options.stroke_width {
        config.style.stroke_width = stroke_width;
    }
    if let Some(stroke_color) = &options.stroke_color {
        config.style.stroke_color = stroke_color.clone();
    }
    if let Some(highlight) = options.highlight_current_word {
        config.style.highlight_current_word = highlight;
    }
    if let Some(highlight_color) = &options.highlight_color {
        config.style.highlight_color = highlight_color.clone();
    }
    if let Some(line_count) = options.line_count {
        config.style.line_count = line_count;
    }
    if let Some(rel_width) = options.rel_width {
        config.style.rel_width = rel_width;
    }
    if let Some(rel_height_pos) = options.rel_height_pos {
        config.style.rel_height_pos = rel_height_pos;
    }
    if let Some(shadow_strength) = options.shadow_strength {
        config.style.shadow_strength = shadow_strength;
    }
    if let Some(shadow_blur) = options.shadow_blur {
        config.style.shadow_blur = shadow_blur;
    }
    if let Some(model_name) = &options.model_name {
        config.transcription.model_name = model_name.clone();
    }
    if let Some(language) = &options.language {
        config.transcription.language = Some(language.clone());
    }
    if let Some(initial_prompt) = &options.initial_prompt {
        config.transcription.initial_prompt = Some(initial_prompt.clone());
    }
    if let Some(mode) = &options.use_local_whisper {
        config.transcription.mode = mode.clone().into();
    }
    if options.export_srt {
        config.render.export_srt = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
