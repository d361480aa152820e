/*!
 * Greedy line wrapping and the caption fit policy.
 */

use std::sync::Arc;

use log::warn;

use crate::errors::LayoutError;

use super::cache::{LayoutCache, WrapKey};
use super::measure::{TextMeasurer, TextStyle};

/// One visually-wrapped row of a caption's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Text of the row
    pub text: String,

    /// Rendered height of the row in pixels
    pub height: u32,
}

/// Output of a wrap pass over one caption's text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WrapResult {
    /// Committed rows in display order
    pub lines: Vec<Line>,

    /// Sum of all row heights in pixels
    pub total_height: u32,
}

/// Greedy single-pass line wrapper
pub struct LineWrapper;

impl LineWrapper {
    /// Wrap `text` into lines no wider than `max_width` pixels.
    ///
    /// Words are taken in order and appended to an accumulator line; when
    /// the tentative line measures at or past `max_width`, the accumulator
    /// is committed and the overflowing word is retried on a fresh line.
    /// A single word wider than `max_width` still becomes its own line:
    /// words are never dropped, truncated, or split.
    ///
    /// Empty input yields an empty result. The output is deterministic for
    /// identical inputs and measurer.
    pub fn wrap(
        text: &str,
        style: &TextStyle,
        max_width: u32,
        measurer: &dyn TextMeasurer,
    ) -> Result<WrapResult, LayoutError> {
        let words: Vec<&str> = text.split_whitespace().collect();

        let mut lines: Vec<Line> = Vec::new();
        let mut total_height = 0u32;

        // Accepted-but-uncommitted accumulator line
        let mut pending: Option<Line> = None;
        let mut current = String::new();
        let mut notified = false;

        // The index advances only when a word is accepted; on overflow the
        // same word is retried against a fresh accumulator.
        let mut word_index = 0;
        while word_index < words.len() {
            let word = words[word_index];
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            let (width, height) = measurer.measure(&candidate, style)?;

            if width < max_width {
                current = candidate;
                pending = Some(Line {
                    text: current.clone(),
                    height,
                });
                word_index += 1;
                continue;
            }

            if pending.is_none() {
                // The word alone is wider than the frame; it cannot be
                // subdivided, so it becomes its own line.
                if !notified {
                    warn!("Word '{}' is too long for the frame", candidate);
                    notified = true;
                }
                pending = Some(Line {
                    text: candidate,
                    height,
                });
                word_index += 1;
            }

            if let Some(line) = pending.take() {
                total_height += line.height;
                lines.push(line);
            }
            current.clear();
        }

        if let Some(line) = pending.take() {
            total_height += line.height;
            lines.push(line);
        }

        Ok(WrapResult {
            lines,
            total_height,
        })
    }
}

/// Policy deciding whether a candidate caption text fits the allotted
/// space: wrapped line count must not exceed the configured maximum.
///
/// The predicate is monotonic: appending words to the text never decreases
/// the required line count, which the greedy segmenter relies on.
pub struct FitPredicate {
    /// Maximum line count per caption
    line_count: usize,

    /// Style inputs forwarded to the wrapper
    style: TextStyle,

    /// Bounding box width in pixels
    frame_width: u32,

    /// Injected measurer
    measurer: Arc<dyn TextMeasurer>,

    /// Shared wrap cache; fit tests and fragment geometry hit the same entries
    cache: LayoutCache,
}

impl FitPredicate {
    /// Build a fit predicate closing over the layout constraints
    pub fn new(
        line_count: usize,
        style: TextStyle,
        frame_width: u32,
        measurer: Arc<dyn TextMeasurer>,
        cache: LayoutCache,
    ) -> Self {
        Self {
            line_count,
            style,
            frame_width,
            measurer,
            cache,
        }
    }

    /// Whether `text` wraps into no more lines than the configured maximum
    pub fn fits(&self, text: &str) -> Result<bool, LayoutError> {
        let key = WrapKey::new(text, &self.style, self.frame_width);
        let wrapped = self.cache.get_or_compute(key, || {
            LineWrapper::wrap(text, &self.style, self.frame_width, self.measurer.as_ref())
        })?;

        Ok(wrapped.lines.len() <= self.line_count)
    }

    /// Maximum line count this predicate allows
    pub fn line_count(&self) -> usize {
        self.line_count
    }
}
