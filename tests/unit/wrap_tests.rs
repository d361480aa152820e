/*!
 * Tests for the greedy line wrapper and fit predicate
 */

use std::sync::Arc;

use capwright::errors::LayoutError;
use capwright::layout::{FitPredicate, LayoutCache, LineWrapper};

use crate::common::{CharWidthMeasurer, FailingMeasurer, test_style};

/// Test wrapping empty text
#[test]
fn test_wrap_withEmptyText_shouldReturnNoLines() {
    let measurer = CharWidthMeasurer::new(10, 20);
    let result = LineWrapper::wrap("", &test_style(), 100, &measurer).unwrap();

    assert!(result.lines.is_empty());
    assert_eq!(result.total_height, 0);
}

/// Test a single word that fits on one line
#[test]
fn test_wrap_withSingleFittingWord_shouldReturnOneLine() {
    let measurer = CharWidthMeasurer::new(10, 20);
    let result = LineWrapper::wrap("hello", &test_style(), 100, &measurer).unwrap();

    assert_eq!(result.lines.len(), 1);
    assert_eq!(result.lines[0].text, "hello");
    assert_eq!(result.lines[0].height, 20);
    assert_eq!(result.total_height, 20);
}

/// Test greedy wrapping across several words
#[test]
fn test_wrap_withMultipleWords_shouldWrapGreedily() {
    let measurer = CharWidthMeasurer::new(10, 20);

    // "one two three" is 130px < 140, adding " four" overflows
    let result =
        LineWrapper::wrap("one two three four five", &test_style(), 140, &measurer).unwrap();

    let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["one two three", "four five"]);
    assert_eq!(result.total_height, 40);
}

/// A tentative width exactly at max_width must wrap, not fit
#[test]
fn test_wrap_withWidthAtBoundary_shouldWrap() {
    let measurer = CharWidthMeasurer::new(10, 20);

    // "ab cd" measures exactly 50
    let result = LineWrapper::wrap("ab cd", &test_style(), 50, &measurer).unwrap();

    let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["ab", "cd"]);
}

/// Test the oversized-word policy with a one pixel frame
#[test]
fn test_wrap_withOversizedWord_shouldEmitOwnLine() {
    let measurer = CharWidthMeasurer::new(10, 20);
    let result =
        LineWrapper::wrap("supercalifragilistic", &test_style(), 1, &measurer).unwrap();

    // Never dropped, never truncated, never an infinite loop
    assert_eq!(result.lines.len(), 1);
    assert_eq!(result.lines[0].text, "supercalifragilistic");
    assert_eq!(result.total_height, 20);
}

/// Every oversized word gets its own line
#[test]
fn test_wrap_withAllWordsOversized_shouldEmitOneLineEach() {
    let measurer = CharWidthMeasurer::new(10, 20);
    let result = LineWrapper::wrap("tiny frame here", &test_style(), 1, &measurer).unwrap();

    let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["tiny", "frame", "here"]);
    assert_eq!(result.total_height, 60);
}

/// An oversized word mid-text commits the pending line first
#[test]
fn test_wrap_withOversizedWordMidText_shouldCommitPendingLineFirst() {
    let measurer = CharWidthMeasurer::new(10, 20);

    // "incomprehensibilities" is 210px, wider than the 100px frame
    let result =
        LineWrapper::wrap("a b incomprehensibilities c", &test_style(), 100, &measurer).unwrap();

    let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["a b", "incomprehensibilities", "c"]);
}

/// Total height is the sum of the committed line heights
#[test]
fn test_wrap_withManyLines_shouldSumHeights() {
    let measurer = CharWidthMeasurer::new(10, 17);
    let result =
        LineWrapper::wrap("aa bb cc dd ee ff", &test_style(), 60, &measurer).unwrap();

    let summed: u32 = result.lines.iter().map(|l| l.height).sum();
    assert_eq!(result.total_height, summed);
    assert!(result.lines.len() > 1);
}

/// Identical inputs must produce equal results
#[test]
fn test_wrap_withIdenticalInputs_shouldBeDeterministic() {
    let measurer = CharWidthMeasurer::new(10, 20);
    let style = test_style();

    let first = LineWrapper::wrap("the quick brown fox jumps", &style, 120, &measurer).unwrap();
    let second = LineWrapper::wrap("the quick brown fox jumps", &style, 120, &measurer).unwrap();

    assert_eq!(first, second);
}

/// Measurement failures propagate unmodified
#[test]
fn test_wrap_withFailingMeasurer_shouldPropagateError() {
    let result = LineWrapper::wrap("some text", &test_style(), 100, &FailingMeasurer);

    assert!(matches!(result, Err(LayoutError::Measure(_))));
}

/// Test the fit predicate line count rule
#[test]
fn test_fit_predicate_withinLineCount_shouldFit() {
    let measurer = Arc::new(CharWidthMeasurer::new(10, 20));
    let fits = FitPredicate::new(2, test_style(), 140, measurer, LayoutCache::new());

    // One line
    assert!(fits.fits("one two").unwrap());
    // Two lines
    assert!(fits.fits("one two three four five").unwrap());
    // Three lines
    assert!(!fits.fits("one two three four five six seven eight").unwrap());
}

/// Appending words never lets an unfitting text fit again
#[test]
fn test_fit_predicate_withGrowingText_shouldBeMonotonic() {
    let measurer = Arc::new(CharWidthMeasurer::new(10, 20));
    let fits = FitPredicate::new(1, test_style(), 100, measurer, LayoutCache::new());

    let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let mut text = String::new();
    let mut seen_unfit = false;

    for word in words {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(word);

        let fit = fits.fits(&text).unwrap();
        if seen_unfit {
            assert!(!fit, "text '{}' fit again after an unfitting prefix", text);
        }
        if !fit {
            seen_unfit = true;
        }
    }

    assert!(seen_unfit);
}
