/*!
 * Tests for ASS document generation and ffmpeg progress parsing
 */

use capwright::app_config::StyleConfig;
use capwright::layout::{Fragment, Line, WrapResult};
use capwright::media::VideoInfo;
use capwright::render::{AssDocument, ass_color, format_ass_timestamp, parse_out_time_ms};

fn video() -> VideoInfo {
    VideoInfo {
        width: 1280,
        height: 720,
        duration_secs: 10.0,
    }
}

fn two_line_fragment(highlighted: Option<usize>) -> Fragment {
    Fragment {
        text: "hello bright new world".to_string(),
        start: 1.0,
        end: 1.5,
        wrap: WrapResult {
            lines: vec![
                Line {
                    text: "hello bright".to_string(),
                    height: 40,
                },
                Line {
                    text: "new world".to_string(),
                    height: 40,
                },
            ],
            total_height: 80,
        },
        highlighted_word_index: highlighted,
        y_offset: 320,
    }
}

/// ASS timestamps are H:MM:SS.cc
#[test]
fn test_format_ass_timestamp_withVariousTimes_shouldFormat() {
    assert_eq!(format_ass_timestamp(0.0), "0:00:00.00");
    assert_eq!(format_ass_timestamp(0.5), "0:00:00.50");
    assert_eq!(format_ass_timestamp(61.25), "0:01:01.25");
    assert_eq!(format_ass_timestamp(3661.07), "1:01:01.07");
    // Negative inputs clamp to zero rather than underflow
    assert_eq!(format_ass_timestamp(-1.0), "0:00:00.00");
}

/// ffmpeg -progress out_time lines parse to milliseconds
#[test]
fn test_parse_out_time_withProgressLine_shouldReturnMillis() {
    assert_eq!(parse_out_time_ms("out_time=00:00:12.340000"), Some(12340));
    assert_eq!(parse_out_time_ms("out_time=01:02:03.500000"), Some(3723500));
    assert_eq!(parse_out_time_ms("frame=42"), None);
    assert_eq!(parse_out_time_ms("progress=continue"), None);
}

/// Known color names and hex values map to ASS BGR
#[test]
fn test_ass_color_withKnownColors_shouldMapToBgr() {
    assert_eq!(ass_color("white").unwrap(), "&H00FFFFFF");
    assert_eq!(ass_color("black").unwrap(), "&H00000000");
    assert_eq!(ass_color("yellow").unwrap(), "&H0000FFFF");
    assert_eq!(ass_color("blue").unwrap(), "&H00FF0000");
    assert_eq!(ass_color("#FF8000").unwrap(), "&H000080FF");

    assert!(ass_color("vantablack").is_err());
}

/// The document carries script info, one style, and per-line events
#[test]
fn test_ass_document_withTwoLineFragment_shouldEmitOneEventPerLine() {
    let style = StyleConfig::default();
    let fragments = vec![two_line_fragment(None)];

    let doc = AssDocument::build(&style, &video(), &fragments, "Bangers-Regular").unwrap();
    let content = doc.content();

    assert!(content.contains("[Script Info]"));
    assert!(content.contains("PlayResX: 1280"));
    assert!(content.contains("PlayResY: 720"));
    assert!(content.contains("Style: Caption,Bangers-Regular,100,"));

    let dialogue_count = content.matches("Dialogue:").count();
    assert_eq!(dialogue_count, 2);

    // Lines are centered and stacked: second line sits one height lower
    assert!(content.contains("{\\pos(640,320)}"));
    assert!(content.contains("{\\pos(640,360)}"));

    // Both events share the fragment's time window
    assert_eq!(content.matches("0:00:01.00,0:00:01.50").count(), 2);
}

/// The highlighted word slot gets an inline color override
#[test]
fn test_ass_document_withHighlightedWord_shouldOverrideColor() {
    let style = StyleConfig::default();

    // Word slot 2 is "new", the first word of the second line
    let fragments = vec![two_line_fragment(Some(2))];
    let doc = AssDocument::build(&style, &video(), &fragments, "Bangers-Regular").unwrap();
    let content = doc.content();

    // Highlight yellow, restored to primary white afterwards
    assert!(content.contains("{\\1c&H00FFFF&}new{\\1c&HFFFFFF&}"));
    // The first line carries no override
    assert!(!content.contains("{\\1c&H00FFFF&}hello"));
}

/// Unhighlighted fragments contain no inline overrides
#[test]
fn test_ass_document_withoutHighlight_shouldNotOverride() {
    let style = StyleConfig::default();
    let fragments = vec![two_line_fragment(None)];

    let doc = AssDocument::build(&style, &video(), &fragments, "Bangers-Regular").unwrap();

    assert!(!doc.content().contains("\\1c"));
}

/// An unknown configured color surfaces as an error
#[test]
fn test_ass_document_withBadColor_shouldFail() {
    let mut style = StyleConfig::default();
    style.highlight_color = "sparkle".to_string();

    let result = AssDocument::build(&style, &video(), &[two_line_fragment(None)], "Font");
    assert!(result.is_err());
}
