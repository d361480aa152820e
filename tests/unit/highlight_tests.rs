/*!
 * Tests for per-word highlight window expansion
 */

use capwright::layout::{Caption, HighlightTimeline};

use crate::common::word;

fn caption(words: Vec<capwright::transcript::Word>) -> Caption {
    Caption::from_words(words).expect("caption from non-empty words")
}

/// Reference scenario: two contiguous words, highlighting enabled
#[test]
fn test_expand_withTwoWords_shouldTileWindows() {
    let caption = caption(vec![word("Hi", 0.0, 0.5), word("there", 0.5, 1.0)]);

    let windows = HighlightTimeline::expand(&caption, true);

    assert_eq!(windows.len(), 2);

    assert_eq!(windows[0].start, 0.0);
    assert_eq!(windows[0].end, 0.5);
    assert_eq!(windows[0].highlighted_word_index, Some(0));

    assert_eq!(windows[1].start, 0.5);
    assert_eq!(windows[1].end, 1.0);
    assert_eq!(windows[1].highlighted_word_index, Some(1));
}

/// Highlighting disabled: one window spanning the whole caption
#[test]
fn test_expand_withHighlightDisabled_shouldReturnSingleWindow() {
    let caption = caption(vec![
        word("some", 2.0, 2.5),
        word("spoken", 2.5, 3.8),
        word("words", 3.8, 5.0),
    ]);

    let windows = HighlightTimeline::expand(&caption, false);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start, 2.0);
    assert_eq!(windows[0].end, 5.0);
    assert_eq!(windows[0].highlighted_word_index, None);
}

/// The window of a word extends to the next word's start, covering
/// inter-word silence with the upcoming highlight
#[test]
fn test_expand_withSilenceBetweenWords_shouldExtendToNextStart() {
    let caption = caption(vec![word("wait", 0.0, 0.4), word("what", 0.7, 1.0)]);

    let windows = HighlightTimeline::expand(&caption, true);

    assert_eq!(windows.len(), 2);
    // Not 0.4: the silence until 0.7 still shows the first window
    assert_eq!(windows[0].end, 0.7);
    assert_eq!(windows[1].start, 0.7);
}

/// The last word's window ends at its own end
#[test]
fn test_expand_withLastWord_shouldEndAtWordEnd() {
    let caption = caption(vec![word("only", 1.0, 1.6)]);

    let windows = HighlightTimeline::expand(&caption, true);

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start, 1.0);
    assert_eq!(windows[0].end, 1.6);
    assert_eq!(windows[0].highlighted_word_index, Some(0));
}

/// Windows are contiguous and gap-free over the caption interval
#[test]
fn test_expand_withManyWords_shouldCoverCaptionWithoutGaps() {
    let caption = caption(vec![
        word("a", 0.0, 0.2),
        word("b", 0.3, 0.5),
        word("c", 0.5, 0.9),
        word("d", 1.2, 1.5),
    ]);

    let windows = HighlightTimeline::expand(&caption, true);

    assert_eq!(windows.first().map(|w| w.start), Some(caption.start));
    assert_eq!(windows.last().map(|w| w.end), Some(caption.end));

    for pair in windows.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}
