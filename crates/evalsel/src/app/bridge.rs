//! Building evaluator programs and exchanging fragments with an [`Evaluator`].

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::app::context::ContextProgram;
use crate::domain::document::Document;
use crate::domain::errors::EvalError;
use crate::domain::model::{EvaluationRequest, EvaluationResponse, Selection};

/// Postlude appended to every context program.
///
/// Reads a JSON array of sources from stdin, evaluates each one in order against the module's
/// globals (so side effects carry over to later fragments) and writes the `repr` of every result
/// to stdout as a JSON array. Builtins are reached through `__builtins__` so that names defined by
/// the context program cannot shadow them.
pub const INPUT_HANDLER: &str = "(lambda __env: __import__('json').dump([__builtins__.repr(__builtins__.eval(__src, __env)) for __src in __import__('json').load(__import__('sys').stdin)], __import__('sys').stdout))(__builtins__.globals())\n";

/// Opaque capability that evaluates an ordered batch of fragments against one program.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Run `program` once, feeding it `request`, and return the raw response.
    async fn evaluate(
        &self,
        program: &str,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, EvalError>;
}

/// Concatenate the context program and the input handler.
pub fn build_program(context: &str) -> String {
    let mut program = String::with_capacity(context.len() + 1 + INPUT_HANDLER.len());
    program.push_str(context);
    program.push('\n');
    program.push_str(INPUT_HANDLER);
    program
}

/// Extract and trim the fragment for every selection, preserving order.
pub fn build_request(
    document: &Document,
    selections: &[Selection],
) -> Result<EvaluationRequest, EvalError> {
    let mut fragments = Vec::with_capacity(selections.len());
    for selection in selections {
        let fragment = document.text_in(selection)?.trim();
        if fragment.is_empty() {
            warn!(%selection, "selection is empty after trimming; evaluator will likely reject it");
        }
        fragments.push(fragment.to_owned());
    }
    Ok(EvaluationRequest { fragments })
}

/// Evaluate every selection in `selections` (already normalized) in one evaluator run.
///
/// The response is guaranteed to be index-aligned with `selections` on success.
pub async fn evaluate_selections<E>(
    evaluator: &E,
    context: &ContextProgram,
    document: &Document,
    selections: &[Selection],
) -> Result<EvaluationResponse, EvalError>
where
    E: Evaluator + ?Sized,
{
    let request = build_request(document, selections)?;
    let program = build_program(&context.text);
    debug!(fragments = request.len(), "evaluating fragments");

    let response = evaluator.evaluate(&program, &request).await?;
    if response.len() != request.len() {
        return Err(EvalError::LengthMismatch {
            expected: request.len(),
            actual: response.len(),
        });
    }
    Ok(response)
}
