use anyhow::{Context, Result, anyhow};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::layout::{FontMeasurer, LayoutEngine, resolve_font};
use crate::media;
use crate::render;
use crate::transcribers::{self, TranscribeOptions};
use crate::transcript;

// @module: Application controller for caption generation

/// Main application controller for captioning videos
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        self.config.validate().is_ok()
    }

    /// Output path used when the caller does not name one
    pub fn default_output_path(&self, input_file: &Path) -> PathBuf {
        let output_dir = input_file.parent().unwrap_or(Path::new("."));
        let extension = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "mp4".to_string());

        FileManager::generate_output_path(input_file, output_dir, "captioned", &extension)
    }

    /// Run the main workflow on one video file
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = output_file.unwrap_or_else(|| self.default_output_path(&input_file));
        if output_path.exists() && !force_overwrite {
            // Skip if the output already exists and no force flag
            warn!(
                "Skipping file, output already exists (use -f to force overwrite): {:?}",
                output_path
            );
            return Ok(());
        }

        if let Some(parent) = output_path.parent() {
            FileManager::ensure_dir(parent)?;
        }

        // Resolve the font up front: without measurement no layout can proceed
        let font_path = resolve_font(&self.config.style.font)?;
        let measurer = Arc::new(FontMeasurer::from_file(&font_path)?);

        info!("Probing video: {:?}", input_file);
        let video = media::probe_video(&input_file).await?;

        info!("Extracting audio...");
        let audio_file = tempfile::Builder::new()
            .prefix("capwright-")
            .suffix(".wav")
            .tempfile()
            .context("Failed to create temporary audio file")?;
        media::extract_audio(&input_file, audio_file.path()).await?;

        info!("Transcribing audio...");
        let transcriber = transcribers::create(&self.config.transcription).await?;
        let options = TranscribeOptions::from(&self.config.transcription);
        let transcript_result = transcriber
            .transcribe(audio_file.path(), &options)
            .await
            .with_context(|| format!("Transcription failed ({})", transcriber.name()))?;

        if let Some(language) = &transcript_result.language {
            debug!("Transcriber reported language: {}", language);
        }

        let words = transcript_result.words();
        info!("Transcribed {} word(s)", words.len());

        info!("Generating caption layout...");
        let engine = LayoutEngine::from_config(
            &self.config.style,
            font_path.clone(),
            video.width,
            video.height,
            measurer,
        );

        let captions = engine.segment_captions(&words)?;
        let fragments = engine.fragments_for(&captions)?;
        debug!(
            "{} caption(s), {} fragment(s), frame width {}px",
            captions.len(),
            fragments.len(),
            engine.frame_width()
        );

        info!("Rendering video...");
        render::render_video(
            &input_file,
            &output_path,
            &fragments,
            &self.config.style,
            &self.config.render,
            &video,
            &font_path,
        )
        .await?;

        if self.config.render.export_srt {
            let srt_path = output_path.with_extension("srt");
            transcript::write_srt(&captions, &srt_path)?;
            info!("Exported captions to {:?}", srt_path);
        }

        info!(
            "Done in {} ({} captions, {} fragments)",
            Self::format_duration(start_time.elapsed()),
            captions.len(),
            fragments.len()
        );

        Ok(())
    }

    /// Process every video file under a directory
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        info!("Processing directory: {:?}", input_dir);

        let videos = FileManager::find_video_files(&input_dir)?;
        if videos.is_empty() {
            warn!("No video files found under {:?}", input_dir);
            return Ok(());
        }

        let mut processed_count = 0;
        for video in videos {
            info!("Processing video: {:?}", video);

            if let Err(e) = self.run(video.clone(), None, force_overwrite).await {
                error!("Error processing {:?}: {}", video, e);
            } else {
                processed_count += 1;
            }
        }

        info!("Finished processing {} file(s)", processed_count);
        Ok(())
    }

    /// Format a duration as mm:ss for the completion log
    fn format_duration(duration: std::time::Duration) -> String {
        let total_secs = duration.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}
