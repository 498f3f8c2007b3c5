//! Command-line surface over the `evaluate` and `create_context` commands.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::{info, warn};

use crate::app::commands;
use crate::domain::document::{Document, Editor};
use crate::domain::model::Selection;
use crate::infra::config::Config;
use crate::infra::process::ProcessEvaluator;
use crate::infra::workspace;

#[derive(Parser, Debug)]
#[command(name = "evalsel", author, version, about = "Evaluate selected fragments and splice the results back", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate every selection and replace it with its result
    Evaluate {
        /// Document to edit; without it there is no active editor
        file: Option<PathBuf>,

        /// Selection as LINE:COL-LINE:COL (zero-based), repeatable
        #[arg(short, long = "selection", value_name = "RANGE")]
        selections: Vec<Selection>,

        /// Workspace root holding the context file
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Save the updated document back to FILE instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// Ensure the workspace context file exists
    CreateContext {
        /// Workspace root; discovered from the current directory when omitted
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Open the context file with the system handler afterwards
        #[arg(long)]
        open: bool,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Evaluate {
                file,
                selections,
                workspace,
                write,
            } => run_evaluate(file, selections, workspace, write).await,
            Commands::CreateContext { workspace, open } => run_create_context(workspace, open),
            Commands::Completions { shell } => {
                let mut command = Cli::command();
                clap_complete::generate(shell, &mut command, "evalsel", &mut io::stdout());
                Ok(())
            }
        }
    }
}

async fn run_evaluate(
    file: Option<PathBuf>,
    selections: Vec<Selection>,
    workspace: Option<PathBuf>,
    write: bool,
) -> Result<()> {
    let start = file
        .as_deref()
        .and_then(|path| path.canonicalize().ok())
        .and_then(|path| path.parent().map(PathBuf::from));
    let root = workspace::resolve_workspace(workspace.as_deref(), start.as_deref());
    let config = Config::load(root.as_deref())?;
    let evaluator = ProcessEvaluator::from_settings(&config.evaluator);

    let mut editor = match &file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read document {}", path.display()))?;
            Some(Editor::new(Document::new(text), selections))
        }
        None => None,
    };

    let outcome = commands::evaluate(
        editor.as_mut(),
        root.as_deref(),
        &config.context_resolver(),
        &evaluator,
    )
    .await?;
    info!(replaced = outcome.replaced, "evaluate finished");

    if let (Some(editor), Some(path)) = (editor, file) {
        if write {
            fs::write(&path, editor.document.text())
                .with_context(|| format!("failed to write document {}", path.display()))?;
        } else {
            io::stdout()
                .write_all(editor.document.text().as_bytes())
                .context("failed to write document to stdout")?;
        }
    }
    Ok(())
}

fn run_create_context(workspace: Option<PathBuf>, open: bool) -> Result<()> {
    let cwd = std::env::current_dir().ok();
    let root = workspace::resolve_workspace(workspace.as_deref(), cwd.as_deref());
    let config = Config::load(root.as_deref())?;

    let file = commands::create_context(root.as_deref(), &config.context_resolver())?;
    if file.created {
        info!(path = %file.path.display(), "created context file");
    }
    println!("{}", file.path.display());

    if open && let Err(err) = open::that(&file.path) {
        warn!(path = %file.path.display(), error = %err, "failed to open context file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::model::Position;

    #[test]
    fn parses_repeated_selections() {
        let cli = Cli::try_parse_from([
            "evalsel", "evaluate", "notes.py", "-s", "2:4-2:9", "--selection", "0:0-0:3",
        ])
        .unwrap();
        match cli.command {
            Commands::Evaluate {
                file, selections, ..
            } => {
                assert_eq!(file, Some(PathBuf::from("notes.py")));
                assert_eq!(selections.len(), 2);
                assert_eq!(selections[0].start(), Position::new(2, 4));
                assert_eq!(selections[1].end(), Position::new(0, 3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_selection() {
        let result = Cli::try_parse_from(["evalsel", "evaluate", "a.py", "-s", "nope"]);
        assert!(result.is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
