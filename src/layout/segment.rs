use log::{debug, error};

use crate::errors::LayoutError;
use crate::transcript::Word;

use super::wrap::FitPredicate;

// @module: Grouping the word stream into caption blocks

/// A group of consecutive words destined to be displayed together
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    /// Space-joined concatenation of the word texts
    pub text: String,

    /// Words in spoken order
    pub words: Vec<Word>,

    /// First word's start in seconds
    pub start: f64,

    /// Last word's end in seconds
    pub end: f64,
}

impl Caption {
    /// Build a caption from a non-empty word list; `None` for an empty list
    pub fn from_words(words: Vec<Word>) -> Option<Self> {
        let first = words.first()?;
        let last = words.last()?;

        let start = first.start;
        let end = last.end;
        let text = join_words(&words);

        Some(Caption {
            text,
            words,
            start,
            end,
        })
    }
}

/// Space-join the texts of a word slice
pub fn join_words(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Greedy segmenter grouping the time-ordered word stream into captions
/// that satisfy a fit predicate.
pub struct CaptionSegmenter;

impl CaptionSegmenter {
    /// Scan the word stream once, accumulating words into a pending buffer
    /// until the next word would overflow the fit predicate; the buffer is
    /// then closed *excluding* the overflowing word, which seeds the next
    /// caption. A word that does not fit even alone still forms a
    /// singleton caption.
    ///
    /// Every input word lands in exactly one caption, captions come out in
    /// non-decreasing time order, and none of them is empty.
    pub fn segment(words: &[Word], fits: &FitPredicate) -> Result<Vec<Caption>, LayoutError> {
        let mut captions: Vec<Caption> = Vec::new();
        let mut buffer: Vec<Word> = Vec::new();

        for word in words {
            let candidate = if buffer.is_empty() {
                word.text.clone()
            } else {
                format!("{} {}", join_words(&buffer), word.text)
            };

            if fits.fits(&candidate)? {
                buffer.push(word.clone());
                continue;
            }

            if buffer.is_empty() {
                // The word overflows even on its own; an empty caption is
                // not an option, so it goes out as a singleton.
                debug!(
                    "Word '{}' does not fit the frame alone, emitting it as its own caption",
                    word.text
                );
                if let Some(caption) = Caption::from_words(vec![word.clone()]) {
                    captions.push(caption);
                }
                continue;
            }

            // Close the buffer without the overflowing word, which starts
            // the next caption.
            if let Some(caption) = Caption::from_words(std::mem::take(&mut buffer)) {
                captions.push(caption);
            }
            buffer.push(word.clone());
        }

        // Flush the trailing buffer
        if let Some(caption) = Caption::from_words(buffer) {
            captions.push(caption);
        }

        // Protect against accidental loss of words
        let total_grouped: usize = captions.iter().map(|c| c.words.len()).sum();
        if total_grouped != words.len() {
            error!(
                "CRITICAL ERROR: Lost words during segmentation! Input: {}, after segmentation: {}",
                words.len(),
                total_grouped
            );
        } else if log::max_level() >= log::LevelFilter::Debug {
            for (i, caption) in captions.iter().enumerate() {
                debug!(
                    "Caption {}: {} word(s), [{:.3}s, {:.3}s): {}",
                    i + 1,
                    caption.words.len(),
                    caption.start,
                    caption.end,
                    caption.text
                );
            }
        }

        Ok(captions)
    }
}
