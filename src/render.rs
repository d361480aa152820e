/*!
 * Caption rendering: ASS subtitle generation and ffmpeg burn-in.
 *
 * Fragments from the layout engine become one ASS dialogue event per
 * wrapped line, with the highlighted word expressed as an inline color
 * override. ffmpeg then burns the subtitle track into the video.
 */

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::app_config::{RenderConfig, StyleConfig};
use crate::errors::RenderError;
use crate::layout::Fragment;
use crate::media::{VideoInfo, filter_ffmpeg_stderr};

// @const: ffmpeg -progress out_time line
static OUT_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"out_time=(\d+):(\d{2}):(\d{2})\.(\d+)").unwrap()
});

/// A complete ASS subtitle document ready to hand to ffmpeg
#[derive(Debug, Clone)]
pub struct AssDocument {
    content: String,
}

impl AssDocument {
    /// Build the document from layout fragments.
    ///
    /// Each fragment emits one dialogue event per wrapped line, positioned
    /// with `\pos` at the line's top-center. The highlighted word slot is
    /// wrapped in an inline primary-color override.
    pub fn build(
        style: &StyleConfig,
        video: &VideoInfo,
        fragments: &[Fragment],
        font_family: &str,
    ) -> Result<Self, RenderError> {
        let primary = ass_color(&style.font_color)?;
        let outline = ass_color(&style.stroke_color)?;
        let highlight = ass_color(&style.highlight_color)?;

        let shadow_depth = style.shadow_strength.round() as u32;
        let blur_px = style.font_size as f64 * style.shadow_blur;

        let mut content = String::new();

        content.push_str("[Script Info]\n");
        content.push_str("ScriptType: v4.00+\n");
        content.push_str(&format!("PlayResX: {}\n", video.width));
        content.push_str(&format!("PlayResY: {}\n", video.height));
        content.push_str("WrapStyle: 2\n");
        content.push_str("ScaledBorderAndShadow: yes\n\n");

        content.push_str("[V4+ Styles]\n");
        content.push_str(
            "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, \
             BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, \
             BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n",
        );
        // Alignment 8 anchors \pos at the top-center of each line
        content.push_str(&format!(
            "Style: Caption,{},{},{},{},{},&H00000000,0,0,0,0,100,100,0,0,1,{},{},8,0,0,0,1\n\n",
            font_family, style.font_size, primary, highlight, outline, style.stroke_width, shadow_depth
        ));

        content.push_str("[Events]\n");
        content.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");

        let center_x = video.width / 2;

        for fragment in fragments {
            let start = format_ass_timestamp(fragment.start);
            let end = format_ass_timestamp(fragment.end);

            let mut line_y = fragment.y_offset;
            let mut word_slot = 0usize;

            for line in &fragment.wrap.lines {
                let mut text = String::new();
                text.push_str(&format!("{{\\pos({},{})}}", center_x, line_y));
                if blur_px > 0.0 && shadow_depth > 0 {
                    text.push_str(&format!("{{\\blur{:.1}}}", blur_px));
                }

                let mut first = true;
                for word in line.text.split_whitespace() {
                    if !first {
                        text.push(' ');
                    }
                    first = false;

                    if fragment.highlighted_word_index == Some(word_slot) {
                        text.push_str(&format!(
                            "{{\\1c{}}}{}{{\\1c{}}}",
                            override_color(&highlight),
                            escape_ass_text(word),
                            override_color(&primary)
                        ));
                    } else {
                        text.push_str(&escape_ass_text(word));
                    }
                    word_slot += 1;
                }

                content.push_str(&format!(
                    "Dialogue: 0,{},{},Caption,,0,0,0,,{}\n",
                    start, end, text
                ));

                line_y += line.height as i32;
            }
        }

        Ok(AssDocument { content })
    }

    /// The rendered document text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the document to a file
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::file_utils::FileManager::write_to_file(&path, &self.content)
            .with_context(|| format!("Failed to write ASS file: {:?}", path.as_ref()))
    }
}

/// Burn an ASS subtitle file into a video with ffmpeg, driving a progress
/// bar from its `-progress` output.
pub async fn burn_in(
    input: &Path,
    ass_path: &Path,
    output: &Path,
    fonts_dir: &Path,
    render: &RenderConfig,
    video: &VideoInfo,
) -> Result<(), RenderError> {
    let filter = format!(
        "ass='{}':fontsdir='{}'",
        escape_filter_path(ass_path),
        escape_filter_path(fonts_dir)
    );

    let mut child = Command::new("ffmpeg")
        .args([
            "-y",
            "-i",
            input.to_str().unwrap_or_default(),
            "-vf",
            &filter,
            "-c:v",
            &render.video_codec,
            "-crf",
            &render.crf.to_string(),
            "-c:a",
            "copy",
            "-loglevel",
            "error",
            "-progress",
            "pipe:1",
            output.to_str().unwrap_or_default(),
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RenderError::FfmpegMissing(e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RenderError::FfmpegFailed("ffmpeg stdout not captured".to_string()))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| RenderError::FfmpegFailed("ffmpeg stderr not captured".to_string()))?;

    // Drain stderr concurrently so a chatty encoder cannot deadlock us
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf).await;
        String::from_utf8_lossy(&buf).to_string()
    });

    let total_ms = (video.duration_secs * 1000.0).max(1.0) as u64;
    let progress = ProgressBar::new(total_ms);
    progress.set_style(
        ProgressStyle::with_template("{spinner} Rendering [{bar:40}] {percent}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if let Some(ms) = parse_out_time_ms(&line) {
            progress.set_position(ms.min(total_ms));
        } else if line.trim() == "progress=end" {
            progress.set_position(total_ms);
        }
    }

    let status = child
        .wait()
        .await
        .map_err(|e| RenderError::Interrupted(e.to_string()))?;

    let stderr_text = stderr_task.await.unwrap_or_default();
    progress.finish_and_clear();

    if !status.success() {
        let filtered = filter_ffmpeg_stderr(&stderr_text);
        return Err(RenderError::FfmpegFailed(filtered));
    }

    if !stderr_text.trim().is_empty() {
        debug!("ffmpeg stderr: {}", stderr_text.trim());
    }

    info!("Wrote captioned video to {:?}", output);
    Ok(())
}

/// Render the fragments onto the video through a temporary ASS file
pub async fn render_video(
    input: &Path,
    output: &Path,
    fragments: &[Fragment],
    style: &StyleConfig,
    render: &RenderConfig,
    video: &VideoInfo,
    font_path: &Path,
) -> Result<()> {
    if fragments.is_empty() {
        warn!("No caption fragments to render; copying the video unchanged");
        std::fs::copy(input, output)
            .with_context(|| format!("Failed to copy {:?} to {:?}", input, output))?;
        return Ok(());
    }

    // libass matches fonts by family; the file stem doubles as the
    // postscript name for the fonts this tool bundles
    let font_family = font_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Font path has no file name: {:?}", font_path))?;

    let fonts_dir = font_path
        .parent()
        .ok_or_else(|| anyhow!("Font path has no parent directory: {:?}", font_path))?;

    let document = AssDocument::build(style, video, fragments, &font_family)?;

    let ass_file = tempfile::Builder::new()
        .prefix("capwright-")
        .suffix(".ass")
        .tempfile()
        .context("Failed to create temporary ASS file")?;
    document.write_to(ass_file.path())?;

    debug!(
        "Burning {} fragment(s) via {:?}",
        fragments.len(),
        ass_file.path()
    );

    burn_in(input, ass_file.path(), output, fonts_dir, render, video).await?;
    Ok(())
}

/// Format seconds as an ASS timestamp (H:MM:SS.cc)
pub fn format_ass_timestamp(seconds: f64) -> String {
    let total_cs = (seconds.max(0.0) * 100.0).round() as u64;
    let hours = total_cs / 360_000;
    let minutes = (total_cs % 360_000) / 6_000;
    let secs = (total_cs % 6_000) / 100;
    let centis = total_cs % 100;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
}

/// Parse an `out_time=` progress line to milliseconds
pub fn parse_out_time_ms(line: &str) -> Option<u64> {
    let caps = OUT_TIME_REGEX.captures(line)?;

    let hours: u64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(3)?.as_str().parse().ok()?;
    // Fraction is microseconds; keep millisecond precision
    let frac = caps.get(4)?.as_str();
    let millis: u64 = frac
        .chars()
        .take(3)
        .collect::<String>()
        .parse()
        .unwrap_or(0);

    Some((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
}

/// Convert a color name or `#RRGGBB` value to an ASS `&HAABBGGRR` style color
pub fn ass_color(color: &str) -> Result<String, RenderError> {
    let (r, g, b) = parse_color(color)?;
    Ok(format!("&H00{:02X}{:02X}{:02X}", b, g, r))
}

/// Inline override form of a style color (`&HBBGGRR&`)
fn override_color(style_color: &str) -> String {
    // Strip the alpha byte from "&H00BBGGRR"
    let hex = style_color.trim_start_matches("&H");
    format!("&H{}&", &hex[2..])
}

fn parse_color(color: &str) -> Result<(u8, u8, u8), RenderError> {
    let named = match color.to_lowercase().as_str() {
        "white" => Some((255, 255, 255)),
        "black" => Some((0, 0, 0)),
        "yellow" => Some((255, 255, 0)),
        "red" => Some((255, 0, 0)),
        "green" => Some((0, 128, 0)),
        "blue" => Some((0, 0, 255)),
        "cyan" => Some((0, 255, 255)),
        "magenta" => Some((255, 0, 255)),
        "orange" => Some((255, 165, 0)),
        "gray" | "grey" => Some((128, 128, 128)),
        _ => None,
    };

    if let Some(rgb) = named {
        return Ok(rgb);
    }

    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Ok((r, g, b));
        }
    }

    Err(RenderError::FfmpegFailed(format!(
        "Unknown color '{}': expected a known name or #RRGGBB",
        color
    )))
}

/// Escape a path for use inside an ffmpeg filter argument
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

/// Escape caption text for an ASS dialogue event
fn escape_ass_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('{', "(").replace('}', ")")
}
