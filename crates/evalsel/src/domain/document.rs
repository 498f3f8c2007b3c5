//! In-memory text documents and the editor view over them.

use crate::domain::errors::DomainError;
use crate::domain::model::{Position, Selection};

/// An owned UTF-8 buffer addressed by zero-based line/character positions.
///
/// Lines are split on `\n`; `character` counts Unicode scalar values within a line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    text: String,
}

/// One replacement inside an [`EditBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Selection,
    pub new_text: String,
}

/// A set of replacements applied all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditBatch {
    edits: Vec<TextEdit>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, range: Selection, new_text: impl Into<String>) {
        self.edits.push(TextEdit {
            range,
            new_text: new_text.into(),
        });
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Borrow the text covered by `selection`.
    pub fn text_in(&self, selection: &Selection) -> Result<&str, DomainError> {
        let (start, end) = self.byte_range(selection)?;
        Ok(&self.text[start..end])
    }

    /// Apply every edit in `batch` or none of them.
    ///
    /// Ranges are validated against the current text before anything is written, and overlapping
    /// ranges reject the whole batch.
    pub fn apply(&mut self, batch: EditBatch) -> Result<(), DomainError> {
        let mut resolved = Vec::with_capacity(batch.edits.len());
        for edit in batch.edits {
            let (start, end) = self.byte_range(&edit.range)?;
            resolved.push((start, end, edit.range, edit.new_text));
        }
        resolved.sort_by_key(|(start, end, _, _)| (*start, *end));

        for pair in resolved.windows(2) {
            if pair[1].0 < pair[0].1 {
                return Err(DomainError::OverlappingEdits(format!(
                    "{} and {}",
                    pair[0].2, pair[1].2
                )));
            }
        }

        let mut updated = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for (start, end, _, new_text) in &resolved {
            updated.push_str(&self.text[cursor..*start]);
            updated.push_str(new_text);
            cursor = *end;
        }
        updated.push_str(&self.text[cursor..]);

        self.text = updated;
        Ok(())
    }

    fn byte_range(&self, selection: &Selection) -> Result<(usize, usize), DomainError> {
        Ok((
            self.offset_of(selection.start())?,
            self.offset_of(selection.end())?,
        ))
    }

    fn offset_of(&self, position: Position) -> Result<usize, DomainError> {
        let mut line_start = 0;
        for _ in 0..position.line {
            let newline = self.text[line_start..].find('\n').ok_or_else(|| {
                DomainError::InvalidSelection(format!(
                    "line {} is past the end of the document ({} lines)",
                    position.line,
                    self.line_count()
                ))
            })?;
            line_start += newline + 1;
        }

        let line = match self.text[line_start..].find('\n') {
            Some(len) => &self.text[line_start..line_start + len],
            None => &self.text[line_start..],
        };

        if position.character == 0 {
            return Ok(line_start);
        }
        match line.char_indices().nth(position.character) {
            Some((offset, _)) => Ok(line_start + offset),
            None if line.chars().count() == position.character => Ok(line_start + line.len()),
            None => Err(DomainError::InvalidSelection(format!(
                "character {} is past the end of line {}",
                position.character, position.line
            ))),
        }
    }
}

/// A document together with its active selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub document: Document,
    pub selections: Vec<Selection>,
}

impl Editor {
    pub fn new(document: Document, selections: Vec<Selection>) -> Self {
        Self {
            document,
            selections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(range: &str) -> Selection {
        range.parse().unwrap()
    }

    #[test]
    fn reads_single_and_multi_line_ranges() {
        let doc = Document::new("alpha\n  beta\ngamma");
        assert_eq!(doc.text_in(&sel("0:1-0:4")).unwrap(), "lph");
        assert_eq!(doc.text_in(&sel("1:0-2:2")).unwrap(), "  beta\nga");
        assert_eq!(doc.text_in(&sel("2:5-2:5")).unwrap(), "");
        assert_eq!(doc.line_count(), 3);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let doc = Document::new("é = 'ü'\n");
        assert_eq!(doc.text_in(&sel("0:4-0:7")).unwrap(), "'ü'");
    }

    #[test]
    fn out_of_range_positions_are_invalid() {
        let doc = Document::new("one\ntwo");
        assert!(doc.text_in(&sel("0:0-0:4")).is_err());
        assert!(doc.text_in(&sel("2:0")).is_err());
    }

    #[test]
    fn applies_batch_regardless_of_submission_order() {
        let mut doc = Document::new("a = 1\nb = 2\n");
        let mut batch = EditBatch::new();
        batch.replace(sel("1:4-1:5"), "20");
        batch.replace(sel("0:4-0:5"), "10");
        doc.apply(batch).unwrap();
        assert_eq!(doc.text(), "a = 10\nb = 20\n");
    }

    #[test]
    fn invalid_edit_leaves_document_untouched() {
        let mut doc = Document::new("x\ny\n");
        let mut batch = EditBatch::new();
        batch.replace(sel("0:0-0:1"), "changed");
        batch.replace(sel("9:0-9:1"), "nope");
        assert!(doc.apply(batch).is_err());
        assert_eq!(doc.text(), "x\ny\n");
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let mut doc = Document::new("abcdef");
        let mut batch = EditBatch::new();
        batch.replace(sel("0:0-0:3"), "x");
        batch.replace(sel("0:2-0:5"), "y");
        assert!(matches!(
            doc.apply(batch),
            Err(DomainError::OverlappingEdits(_))
        ));
        assert_eq!(doc.text(), "abcdef");
    }
}
