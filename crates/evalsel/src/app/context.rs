//! Resolution and bootstrap of the workspace context program.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::errors::EvalError;

/// Seed used when the workspace has no context file of its own.
pub const DEFAULT_CONTEXT: &str = "i = iter(range(1000000000))\n";

/// Location of the context file relative to the workspace root.
pub const DEFAULT_CONTEXT_PATH: &str = ".vscode/context.py";

/// Where the resolved context program came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextSource {
    Default,
    File(PathBuf),
}

/// Context program text plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextProgram {
    pub source: ContextSource,
    pub text: String,
}

/// Outcome of [`ContextResolver::ensure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFile {
    pub path: PathBuf,
    pub created: bool,
}

/// Locates the context file for an optional workspace root.
#[derive(Debug, Clone)]
pub struct ContextResolver {
    relative_path: PathBuf,
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_PATH)
    }
}

impl ContextResolver {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }

    pub fn path_for(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.relative_path)
    }

    /// Read the context program fresh from disk.
    ///
    /// A missing workspace or missing file yields [`DEFAULT_CONTEXT`]. Any other read failure is
    /// returned rather than masked by the default.
    pub fn resolve(&self, workspace: Option<&Path>) -> Result<ContextProgram, EvalError> {
        let Some(workspace) = workspace else {
            debug!("no workspace root; using default context");
            return Ok(ContextProgram::default());
        };

        let path = self.path_for(workspace);
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "loaded context file");
                Ok(ContextProgram {
                    source: ContextSource::File(path),
                    text,
                })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "context file absent; using default context");
                Ok(ContextProgram::default())
            }
            Err(source) => Err(EvalError::ContextRead { path, source }),
        }
    }

    /// Create the context file with default content unless it already exists.
    pub fn ensure(&self, workspace: Option<&Path>) -> Result<ContextFile, EvalError> {
        let workspace = workspace.ok_or(EvalError::NoWorkspace)?;
        let path = self.path_for(workspace);

        if path.exists() {
            return Ok(ContextFile {
                path,
                created: false,
            });
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| EvalError::ContextWrite {
                path: path.clone(),
                source,
            })?;
        }

        fs::write(&path, DEFAULT_CONTEXT).map_err(|source| EvalError::ContextWrite {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "created context file");

        Ok(ContextFile {
            path,
            created: true,
        })
    }
}

impl Default for ContextProgram {
    fn default() -> Self {
        Self {
            source: ContextSource::Default,
            text: DEFAULT_CONTEXT.to_owned(),
        }
    }
}
