//! Mapping evaluation results back onto their selections.

use crate::domain::document::{Document, EditBatch};
use crate::domain::errors::EvalError;
use crate::domain::model::{EvaluationResponse, Selection};

/// Leading whitespace of `text`, or `""` when there is no non-whitespace content.
pub fn indent_of(text: &str) -> &str {
    let rest = text.trim_start();
    if rest.is_empty() {
        return "";
    }
    &text[..text.len() - rest.len()]
}

/// Build one replacement per selection, reapplying each selection's original indentation.
///
/// `selections` and `response` must be index-aligned; a length mismatch is refused before any
/// replacement is produced.
pub fn build_edits(
    document: &Document,
    selections: &[Selection],
    response: &EvaluationResponse,
) -> Result<EditBatch, EvalError> {
    if selections.len() != response.len() {
        return Err(EvalError::LengthMismatch {
            expected: selections.len(),
            actual: response.len(),
        });
    }

    let mut batch = EditBatch::new();
    for (selection, result) in selections.iter().zip(&response.results) {
        let original = document.text_in(selection)?;
        let mut replacement = String::with_capacity(original.len() + result.len());
        replacement.push_str(indent_of(original));
        replacement.push_str(result);
        batch.replace(*selection, replacement);
    }
    Ok(batch)
}

/// Build and apply the replacements as a single atomic edit.
pub fn splice(
    document: &mut Document,
    selections: &[Selection],
    response: &EvaluationResponse,
) -> Result<usize, EvalError> {
    let batch = build_edits(document, selections, response)?;
    let applied = batch.len();
    document.apply(batch)?;
    Ok(applied)
}
