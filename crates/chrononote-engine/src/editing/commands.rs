use crate::editing::{Delta, Document, EditError};

/// Commands that can be applied to the document
///
/// Each command compiles to zero or more structural [`Delta`]s. A plain
/// content replacement produces none; line splits, merges, deletions and
/// multi-line pastes produce one delta per line-index change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Replace a line's content in place. Empty text with more than one
    /// line present is reinterpreted as a line deletion. Text containing
    /// `'\n'` (a paste) replaces the line with the first fragment and
    /// inserts the remaining fragments after it.
    SetLine { index: usize, text: String },
    /// Split the line at char offset `at`; the tail becomes line `index + 1`
    SplitLine { index: usize, at: usize },
    /// Concatenate line `index` onto the end of line `index - 1`
    MergeWithPrevious { index: usize },
    /// Remove the line outright
    DeleteLine { index: usize },
}

/// Apply a command to the document, returning the structural deltas
pub(crate) fn apply_command(doc: &mut Document, cmd: &Cmd) -> Result<Vec<Delta>, EditError> {
    match cmd {
        Cmd::SetLine { index, text } => {
            if text.is_empty() && doc.line_count() > 1 {
                // Emptying a line deletes it while other lines remain
                return Ok(vec![doc.delete_line(*index)?]);
            }
            let mut fragments = text.split('\n');
            doc.replace_line(*index, fragments.next().unwrap_or(""))?;
            let mut deltas = Vec::new();
            for (offset, fragment) in fragments.enumerate() {
                deltas.push(doc.insert_line(index + 1 + offset, fragment)?);
            }
            Ok(deltas)
        }
        Cmd::SplitLine { index, at } => Ok(vec![doc.split_line(*index, *at)?]),
        Cmd::MergeWithPrevious { index } => Ok(vec![doc.merge_with_previous(*index)?]),
        Cmd::DeleteLine { index } => Ok(vec![doc.delete_line(*index)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::DeltaKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_line_replaces_content_without_delta() {
        let mut doc = Document::from_text("a\nb");
        let deltas = apply_command(
            &mut doc,
            &Cmd::SetLine {
                index: 0,
                text: "hello".to_string(),
            },
        )
        .unwrap();

        assert_eq!(doc.lines(), ["hello", "b"]);
        assert!(deltas.is_empty(), "content change is not structural");
    }

    #[test]
    fn test_set_line_empty_deletes_when_other_lines_remain() {
        let mut doc = Document::from_text("a\nb");
        let deltas = apply_command(
            &mut doc,
            &Cmd::SetLine {
                index: 0,
                text: String::new(),
            },
        )
        .unwrap();

        assert_eq!(doc.lines(), ["b"]);
        assert_eq!(deltas, vec![Delta::remove(0)]);
    }

    #[test]
    fn test_set_line_empty_keeps_the_only_line() {
        let mut doc = Document::from_text("something");
        let deltas = apply_command(
            &mut doc,
            &Cmd::SetLine {
                index: 0,
                text: String::new(),
            },
        )
        .unwrap();

        assert_eq!(doc.lines(), [""]);
        assert!(deltas.is_empty());
    }

    #[test]
    fn test_set_line_multiline_paste_inserts_continuations() {
        let mut doc = Document::from_text("x\ny");
        let deltas = apply_command(
            &mut doc,
            &Cmd::SetLine {
                index: 0,
                text: "one\ntwo\nthree".to_string(),
            },
        )
        .unwrap();

        assert_eq!(doc.lines(), ["one", "two", "three", "y"]);
        assert_eq!(deltas, vec![Delta::insert(1), Delta::insert(2)]);
        assert!(deltas.iter().all(|d| d.kind == DeltaKind::Insert));
    }

    #[test]
    fn test_split_command_produces_insert_delta() {
        let mut doc = Document::from_text("hello");
        let deltas = apply_command(&mut doc, &Cmd::SplitLine { index: 0, at: 2 }).unwrap();

        assert_eq!(doc.lines(), ["he", "llo"]);
        assert_eq!(deltas, vec![Delta::insert(1)]);
    }

    #[test]
    fn test_precondition_violation_propagates() {
        let mut doc = Document::from_text("only");
        let result = apply_command(&mut doc, &Cmd::DeleteLine { index: 0 });
        assert_eq!(result, Err(EditError::LastLineDeletion));
    }
}
