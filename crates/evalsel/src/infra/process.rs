//! Evaluator backed by a fresh interpreter subprocess per invocation.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::app::bridge::Evaluator;
use crate::domain::errors::EvalError;
use crate::domain::model::{EvaluationRequest, EvaluationResponse};
use crate::infra::config::EvaluatorSettings;

/// Runs `<program> <args..> -c <program text>` and speaks the JSON protocol over stdio.
#[derive(Debug, Clone)]
pub struct ProcessEvaluator {
    program: String,
    args: Vec<String>,
}

impl ProcessEvaluator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn from_settings(settings: &EvaluatorSettings) -> Self {
        Self {
            program: settings.program.clone(),
            args: settings.args.clone(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl Evaluator for ProcessEvaluator {
    async fn evaluate(
        &self,
        program: &str,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, EvalError> {
        let payload = serde_json::to_vec(request).map_err(EvalError::Encode)?;
        let start = Instant::now();

        debug!(program = %self.program, fragments = request.len(), "launching evaluator");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("-c")
            .arg(program)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EvalError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            EvalError::Io(std::io::Error::other("evaluator stdin was not captured"))
        })?;
        let feed = async move {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(EvalError::Io)?;
        debug!(
            status = %output.status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "evaluator exited"
        );

        if !output.status.success() {
            return Err(EvalError::Process {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_owned(),
            });
        }
        fed.map_err(EvalError::Io)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim()).map_err(EvalError::MalformedOutput)
    }
}
