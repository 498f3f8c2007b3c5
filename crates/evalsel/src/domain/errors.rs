//! Domain-specific errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("edits overlap at {0}")]
    OverlappingEdits(String),
}

/// Coarse category of an [`EvalError`], used when logging failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Environment,
    ContextIo,
    Process,
    Protocol,
    Document,
}

/// Every way a command invocation can fail. None of these are recovered internally.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("No active text editor")]
    NoActiveEditor,
    #[error("No workspace selected")]
    NoWorkspace,
    #[error("failed to read context file {}: {source}", .path.display())]
    ContextRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create context file {}: {source}", .path.display())]
    ContextWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to launch evaluator '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("evaluator exited with {status}: {stderr}")]
    Process { status: String, stderr: String },
    #[error("evaluator I/O failed: {0}")]
    Io(#[source] io::Error),
    #[error("failed to encode evaluation request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("malformed evaluator output: {0}")]
    MalformedOutput(#[source] serde_json::Error),
    #[error("evaluator returned {actual} results for {expected} fragments")]
    LengthMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Document(#[from] DomainError),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::NoActiveEditor | EvalError::NoWorkspace => ErrorKind::Environment,
            EvalError::ContextRead { .. } | EvalError::ContextWrite { .. } => ErrorKind::ContextIo,
            EvalError::Launch { .. } | EvalError::Process { .. } => ErrorKind::Process,
            EvalError::Io(_)
            | EvalError::Encode(_)
            | EvalError::MalformedOutput(_)
            | EvalError::LengthMismatch { .. } => ErrorKind::Protocol,
            EvalError::Document(_) => ErrorKind::Document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn messages_surface_process_diagnostics_verbatim() {
        let err = EvalError::Process {
            status: "exit status: 1".into(),
            stderr: "SyntaxError: invalid syntax".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Process);
        assert_snapshot!(err.to_string(), @"evaluator exited with exit status: 1: SyntaxError: invalid syntax");
    }

    #[test]
    fn length_mismatch_is_a_protocol_error() {
        let err = EvalError::LengthMismatch {
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_snapshot!(err.to_string(), @"evaluator returned 1 results for 2 fragments");
    }

    #[test]
    fn environment_errors_match_editor_wording() {
        assert_eq!(EvalError::NoActiveEditor.kind(), ErrorKind::Environment);
        assert_snapshot!(EvalError::NoActiveEditor.to_string(), @"No active text editor");
        assert_snapshot!(EvalError::NoWorkspace.to_string(), @"No workspace selected");
    }
}
