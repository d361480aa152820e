/*!
 * Text measurement and font resolution.
 *
 * Measurement is injected into the layout engine behind the
 * [`TextMeasurer`] trait so the wrapping and segmentation logic stays a
 * pure function of its inputs. The production implementation loads the
 * resolved font with fontdue and sums glyph advances.
 */

use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};

use crate::errors::LayoutError;

/// Style parameters that affect the rendered size of a piece of text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextStyle {
    /// Resolved path of the font file
    pub font: PathBuf,

    /// Font size in pixels
    pub font_size: u32,

    /// Outline stroke width in pixels, padded onto both axes
    pub stroke_width: u32,
}

/// Measures the rendered pixel size of text.
///
/// Implementations must be pure: equal `(text, style)` inputs always
/// produce equal results within a run.
pub trait TextMeasurer: Send + Sync {
    /// Returns rendered `(width, height)` in pixels
    fn measure(&self, text: &str, style: &TextStyle) -> Result<(u32, u32), LayoutError>;
}

/// Production measurer backed by fontdue glyph metrics
pub struct FontMeasurer {
    font: Font,
}

impl FontMeasurer {
    /// Load a measurer for the given font file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let path = path.as_ref();

        let data = fs::read(path).map_err(|e| LayoutError::FontLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let font =
            Font::from_bytes(data, FontSettings::default()).map_err(|e| LayoutError::FontLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(FontMeasurer { font })
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<(u32, u32), LayoutError> {
        let px = style.font_size as f32;

        let mut width = 0.0f32;
        for ch in text.chars() {
            width += self.font.metrics(ch, px).advance_width;
        }

        // Fonts without horizontal line metrics are rare but legal
        let line_height = self
            .font
            .horizontal_line_metrics(px)
            .map(|m| m.new_line_size)
            .unwrap_or(px * 1.2);

        let stroke_pad = style.stroke_width * 2;
        Ok((
            width.ceil() as u32 + stroke_pad,
            line_height.ceil() as u32 + stroke_pad,
        ))
    }
}

/// Resolve a font name to a font file on disk.
///
/// Resolution order: an existing path as given, then the user font
/// directory (`<data_dir>/capwright/fonts`), then a bundled `assets/fonts`
/// directory next to the executable or the working directory.
pub fn resolve_font(font: &str) -> Result<PathBuf, LayoutError> {
    let direct = Path::new(font);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }

    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(data_dir) = dirs::data_dir() {
        candidates.push(data_dir.join("capwright").join("fonts").join(font));
    }

    candidates.push(PathBuf::from("assets").join("fonts").join(font));

    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            candidates.push(exe_dir.join("assets").join("fonts").join(font));
        }
    }

    for candidate in candidates {
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(LayoutError::FontNotFound(font.to_string()))
}
