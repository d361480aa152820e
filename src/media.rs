use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, error};
use serde_json::{Value, from_str};
use tokio::process::Command;

// @module: ffmpeg/ffprobe subprocess wrappers

/// Probe timeout; metadata reads should never take this long
const PROBE_TIMEOUT_SECS: u64 = 60;

/// Audio extraction timeout
const EXTRACT_TIMEOUT_SECS: u64 = 300;

/// Basic video stream properties needed by the layout engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Container duration in seconds
    pub duration_secs: f64,
}

/// Probe a video file's dimensions and duration with ffprobe
pub async fn probe_video<P: AsRef<Path>>(video_path: P) -> Result<VideoInfo> {
    let video_path = video_path.as_ref();

    if !video_path.exists() {
        return Err(anyhow!("Video file not found: {:?}", video_path));
    }

    // Add timeout to prevent hanging on problematic files
    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "v:0",
            "-show_format",
            video_path.to_str().unwrap_or(""),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(PROBE_TIMEOUT_SECS);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffprobe command timed out after {} seconds", PROBE_TIMEOUT_SECS));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr);
        return Err(anyhow!("ffprobe command failed: {}", stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = from_str(&stdout).context("Failed to parse ffprobe JSON output")?;

    let stream = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|s| s.first())
        .ok_or_else(|| anyhow!("No video stream found in {:?}", video_path))?;

    let width = stream
        .get("width")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| anyhow!("Video stream is missing a width"))? as u32;

    let height = stream
        .get("height")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| anyhow!("Video stream is missing a height"))? as u32;

    // Duration lives on the format section for most containers
    let duration_secs = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    debug!(
        "Probed {:?}: {}x{}, {:.2}s",
        video_path, width, height, duration_secs
    );

    Ok(VideoInfo {
        width,
        height,
        duration_secs,
    })
}

/// Extract the audio track of a video to a 16 kHz mono WAV file, the
/// input format whisper expects.
pub async fn extract_audio<P1: AsRef<Path>, P2: AsRef<Path>>(
    video_path: P1,
    audio_path: P2,
) -> Result<()> {
    let video_path = video_path.as_ref();
    let audio_path = audio_path.as_ref();

    if !video_path.exists() {
        return Err(anyhow!("Video file does not exist: {:?}", video_path));
    }

    // Add timeout to prevent hanging on problematic files
    let ffmpeg_future = Command::new("ffmpeg")
        .args([
            "-y", // Overwrite existing file
            "-i",
            video_path.to_str().unwrap_or_default(),
            "-vn",
            "-acodec",
            "pcm_s16le",
            "-ar",
            "16000",
            "-ac",
            "1",
            audio_path.to_str().unwrap_or_default(),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(EXTRACT_TIMEOUT_SECS);
    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| anyhow!("Failed to execute ffmpeg command for audio extraction: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffmpeg command timed out after {} seconds", EXTRACT_TIMEOUT_SECS));
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("Audio extraction failed: {}", filtered);
        return Err(anyhow!("ffmpeg extraction failed: {}", filtered));
    }

    let file_size = std::fs::metadata(audio_path)?.len();
    if file_size == 0 {
        return Err(anyhow!(
            "Extracted audio file is empty — no audio track in {:?}?",
            video_path
        ));
    }

    debug!("Extracted audio to {:?} ({} bytes)", audio_path, file_size);
    Ok(())
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
