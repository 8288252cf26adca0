mod document;
mod gate;

use std::path::{Path, PathBuf};

use crate::command::{self, CommandLine, ParseError};
use document::ConfigDocument;

/// File name looked up at the repository root when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = ".commit-gate.kdl";

/// Command run when nothing else is configured.
pub const DEFAULT_STEP: &str = "pytest test.py -v";

/// Confirmation printed when every step passes.
pub const DEFAULT_SUCCESS: [&str; 2] = ["All tests passed.", "Proceeding with commit."];

/// Top-level configuration loaded from a KDL file.
#[derive(Debug, Default)]
pub struct Config {
    pub gate: GateConfig,
    pub source: ConfigSource,
}

/// Where the active configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file found; built-in defaults.
    #[default]
    Defaults,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Defaults => write!(f, "built-in defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The verification steps and their surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Steps in execution order. Never empty.
    pub steps: Vec<Step>,
    /// Extra environment variables for every step, in file order.
    pub env: Vec<(String, String)>,
    /// The two confirmation lines printed on success.
    pub success: [String; 2],
}

impl Default for GateConfig {
    fn default() -> Self {
        let step = Step::parse(DEFAULT_STEP).unwrap_or_else(|_| Step {
            source: DEFAULT_STEP.to_string(),
            command: CommandLine {
                program: "pytest".to_string(),
                args: vec!["test.py".to_string(), "-v".to_string()],
            },
        });
        GateConfig {
            steps: vec![step],
            env: Vec::new(),
            success: DEFAULT_SUCCESS.map(String::from),
        }
    }
}

/// One external command the gate runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The command string as written in the config.
    pub source: String,
    pub command: CommandLine,
}

impl Step {
    /// Parse a command string into a step.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Ok(Step {
            source: source.trim().to_string(),
            command: command::parse(source)?,
        })
    }
}

/// Errors that can occur when loading or parsing a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid KDL syntax: {0}")]
    ParseError(String),
    #[error("invalid config: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load a config from a KDL file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::ReadError(e)
            }
        })?;
        let mut config = Self::parse(&content)?;
        config.source = ConfigSource::File(path.to_path_buf());
        Ok(config)
    }

    /// Parse a KDL string into a Config.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let doc = ConfigDocument::parse(content)?;

        if let Some((name, line)) = doc.unknown_sections(&["gate"]).into_iter().next() {
            return Err(ConfigError::ParseError(format!(
                "line {line}: unknown section '{name}' (expected gate)"
            )));
        }

        if let Some(line) = doc.duplicate_section("gate") {
            return Err(ConfigError::ParseError(format!(
                "line {line}: duplicate gate section; put every step in one gate block"
            )));
        }

        let gate = match doc.section("gate") {
            Some(section) => gate::parse_section(&section)?,
            None => GateConfig::default(),
        };
        Ok(Config {
            gate,
            source: ConfigSource::Defaults,
        })
    }

    /// Resolve the active config.
    ///
    /// An explicit path must exist. Otherwise `.commit-gate.kdl` in `root` is
    /// used when present, and built-in defaults when it is not.
    pub fn discover(explicit: Option<&Path>, root: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading explicit config");
            return Self::load(path);
        }
        if let Some(root) = root {
            let candidate = root.join(DEFAULT_CONFIG_FILE);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "loading repository config");
                return Self::load(&candidate);
            }
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Config::default())
    }
}
