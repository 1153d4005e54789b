//! Contract with the document-export collaborator.
//!
//! The exporter only needs clean text: it strips any inline human-readable
//! `[HH:MM:SS]` markers before rendering a formatted document. The anchor
//! index itself is never handed to it.

use regex::Regex;

use crate::editing::{Document, TimestampIndex};

fn marker_regex() -> &'static Regex {
    use std::sync::OnceLock;

    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX
        .get_or_init(|| Regex::new(r"\[?\d{2}:\d{2}:\d{2}\]?\s*").expect("Invalid marker regex"))
}

/// Render elapsed milliseconds as an inline `[HH:MM:SS]` marker
pub fn format_marker(time_ms: u64) -> String {
    let total_seconds = time_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    format!("[{hours:02}:{minutes:02}:{seconds:02}]")
}

/// Remove every inline timestamp marker, bracketed or bare
pub fn strip_markers(text: &str) -> String {
    marker_regex().replace_all(text, "").into_owned()
}

/// Notes text with markers prefixed to anchored lines — what the export
/// stage receives before stripping
pub fn annotate(doc: &Document, timestamps: &TimestampIndex) -> String {
    doc.lines()
        .iter()
        .enumerate()
        .map(|(index, line)| match timestamps.get(index) {
            Some(time_ms) => format!("{} {}", format_marker(time_ms), line),
            None => line.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, "[00:00:00]")]
    #[case(59_000, "[00:00:59]")]
    #[case(61_500, "[00:01:01]")] // sub-second precision is dropped
    #[case(3_600_000, "[01:00:00]")]
    #[case(86_399_000, "[23:59:59]")]
    fn test_format_marker(#[case] time_ms: u64, #[case] expected: &str) {
        assert_eq!(format_marker(time_ms), expected);
    }

    #[test]
    fn test_strip_bracketed_markers() {
        assert_eq!(strip_markers("[00:01:30] note text"), "note text");
    }

    #[test]
    fn test_strip_bare_markers() {
        assert_eq!(strip_markers("00:01:30 note text"), "note text");
    }

    #[test]
    fn test_strip_markers_mid_line_and_multiline() {
        let text = "[00:00:05] first\nplain line\nsecond [01:02:03] half";
        assert_eq!(strip_markers(text), "first\nplain line\nsecond half");
    }

    #[test]
    fn test_strip_leaves_clean_text_alone() {
        let text = "nothing to see here";
        assert_eq!(strip_markers(text), text);
    }

    #[test]
    fn test_annotate_prefixes_anchored_lines_only() {
        let doc = Document::from_text("first\nsecond\nthird");
        let timestamps: TimestampIndex = [(0, 0), (2, 65_000)].into_iter().collect();

        assert_eq!(
            annotate(&doc, &timestamps),
            "[00:00:00] first\nsecond\n[00:01:05] third"
        );
    }

    #[test]
    fn test_annotate_then_strip_restores_text() {
        let doc = Document::from_text("alpha\nbeta");
        let timestamps: TimestampIndex = [(1, 3000)].into_iter().collect();

        let annotated = annotate(&doc, &timestamps);
        assert_eq!(strip_markers(&annotated), doc.text());
    }
}
