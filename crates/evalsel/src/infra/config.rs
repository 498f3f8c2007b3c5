//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::context::ContextResolver;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".evalsel/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub evaluator: EvaluatorSettings,
    #[serde(default)]
    pub context: ContextSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorSettings {
    #[serde(default = "EvaluatorSettings::default_program")]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl EvaluatorSettings {
    fn default_program() -> String {
        "python".into()
    }
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSettings {
    #[serde(default = "ContextSettings::default_path")]
    pub path: PathBuf,
}

impl ContextSettings {
    fn default_path() -> PathBuf {
        PathBuf::from(crate::app::context::DEFAULT_CONTEXT_PATH)
    }
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    evaluator: Option<String>,
    context_path: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            evaluator: env::var("EVALSEL_EVALUATOR").ok(),
            context_path: env::var("EVALSEL_CONTEXT_PATH").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(evaluator: &str, context_path: &str) -> Self {
        Self {
            evaluator: Some(evaluator.to_owned()),
            context_path: Some(context_path.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration for an optional workspace root.
    pub fn load(workspace: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace.map(|root| root.join(DEFAULT_WORKSPACE_CONFIG_PATH));
        Self::load_with_layers(global, workspace, env)
    }

    /// Resolver for the configured context file location.
    pub fn context_resolver(&self) -> ContextResolver {
        ContextResolver::new(self.context.path.clone())
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            evaluator: merge_evaluator(self.evaluator, other.evaluator),
            context: merge_context(self.context, other.context),
        }
    }
}

fn merge_evaluator(base: EvaluatorSettings, overlay: EvaluatorSettings) -> EvaluatorSettings {
    EvaluatorSettings {
        program: if overlay.program != EvaluatorSettings::default_program() {
            overlay.program
        } else {
            base.program
        },
        args: if overlay.args.is_empty() {
            base.args
        } else {
            overlay.args
        },
    }
}

fn merge_context(base: ContextSettings, overlay: ContextSettings) -> ContextSettings {
    ContextSettings {
        path: if overlay.path != ContextSettings::default_path() {
            overlay.path
        } else {
            base.path
        },
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("evalsel/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(evaluator) = env.evaluator {
        config.evaluator.program = evaluator;
    }
    if let Some(context_path) = env.context_path {
        config.context.path = PathBuf::from(context_path);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.evaluator.program, "python");
        assert!(config.evaluator.args.is_empty());
        assert_eq!(config.context.path, PathBuf::from(".vscode/context.py"));
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[evaluator]
program = "python3"
args = ["-I"]
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".evalsel"))?;
        fs::write(
            workspace_dir.join(".evalsel/config.toml"),
            r#"
[context]
path = "scratch/seed.py"
"#,
        )?;

        let config = Config::load_with_layers(
            Some(global),
            Some(workspace_dir.join(".evalsel/config.toml")),
            EnvOverrides::default(),
        )?;

        assert_eq!(config.evaluator.program, "python3");
        assert_eq!(config.evaluator.args, vec!["-I".to_string()]);
        assert_eq!(config.context.path, PathBuf::from("scratch/seed.py"));
        assert_eq!(
            config.context_resolver().path_for(&workspace_dir),
            workspace_dir.join("scratch/seed.py")
        );
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("/opt/py/bin/python", "ctx.py");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.evaluator.program, "/opt/py/bin/python");
        assert_eq!(config.context.path, PathBuf::from("ctx.py"));
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
