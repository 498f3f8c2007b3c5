//! Command handlers exposed to the hosting editor.

use std::path::Path;

use tracing::{debug, warn};

use crate::app::bridge::{self, Evaluator};
use crate::app::context::{ContextFile, ContextResolver};
use crate::app::selection;
use crate::app::splice;
use crate::domain::document::Editor;
use crate::domain::errors::EvalError;

/// Summary of a successful `evaluate` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluateOutcome {
    pub replaced: usize,
}

/// Evaluate every active selection of `editor` and splice the results back in.
///
/// The document is mutated only after every earlier stage succeeded. The evaluator is awaited to
/// completion; there is no cancellation.
pub async fn evaluate<E>(
    editor: Option<&mut Editor>,
    workspace: Option<&Path>,
    resolver: &ContextResolver,
    evaluator: &E,
) -> Result<EvaluateOutcome, EvalError>
where
    E: Evaluator + ?Sized,
{
    let result = run_evaluate(editor, workspace, resolver, evaluator).await;
    if let Err(err) = &result {
        warn!(kind = ?err.kind(), error = %err, "evaluate failed");
    }
    result
}

async fn run_evaluate<E>(
    editor: Option<&mut Editor>,
    workspace: Option<&Path>,
    resolver: &ContextResolver,
    evaluator: &E,
) -> Result<EvaluateOutcome, EvalError>
where
    E: Evaluator + ?Sized,
{
    let editor = editor.ok_or(EvalError::NoActiveEditor)?;
    let context = resolver.resolve(workspace)?;
    let selections = selection::normalize(&editor.selections);
    debug!(selections = selections.len(), source = ?context.source, "evaluate invoked");

    let response =
        bridge::evaluate_selections(evaluator, &context, &editor.document, &selections).await?;
    let replaced = splice::splice(&mut editor.document, &selections, &response)?;
    Ok(EvaluateOutcome { replaced })
}

/// Make sure the workspace context file exists, creating it with default content if needed.
pub fn create_context(
    workspace: Option<&Path>,
    resolver: &ContextResolver,
) -> Result<ContextFile, EvalError> {
    let result = resolver.ensure(workspace);
    if let Err(err) = &result {
        warn!(kind = ?err.kind(), error = %err, "create_context failed");
    }
    result
}
