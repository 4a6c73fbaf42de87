use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::ai::gemini::{DEFAULT_GEMINI_API, DEFAULT_GEMINI_MODEL};
use crate::pr::DEFAULT_GITHUB_API;

pub const CONFIG_FILE: &str = ".pr-suggest.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-suggest.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    /// Public repositories need none.
    pub token: Option<String>,
    /// REST API root, for GitHub Enterprise or tests.
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiConfig {
    /// Lowest-precedence source of the Gemini key (after --gemini-key and GEMINI_KEY).
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptConfig {
    /// Upper bound on prompt size in bytes. Unbounded when absent.
    pub max_bytes: Option<usize>,
}

impl Config {
    /// Load configuration from .pr-suggest.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence,
    /// falls back to GITHUB_TOKEN env var.
    pub fn github_token(&self) -> Option<String> {
        self.resolve_github_token(std::env::var("GITHUB_TOKEN").ok())
    }

    fn resolve_github_token(&self, env_token: Option<String>) -> Option<String> {
        let non_blank = |t: &String| !t.trim().is_empty();
        self.github
            .token
            .clone()
            .filter(non_blank)
            .or_else(|| env_token.filter(non_blank))
    }

    pub fn github_api_base(&self) -> &str {
        self.github.api_base.as_deref().unwrap_or(DEFAULT_GITHUB_API)
    }

    /// Resolve the Gemini key: explicit CLI value, then GEMINI_KEY, then
    /// the config file. Returns an empty string when none is set so that
    /// client construction reports the missing key.
    pub fn gemini_key(&self, cli_key: Option<&str>) -> String {
        self.resolve_gemini_key(cli_key, std::env::var("GEMINI_KEY").ok())
    }

    fn resolve_gemini_key(&self, cli_key: Option<&str>, env_key: Option<String>) -> String {
        let non_blank = |k: &String| !k.trim().is_empty();
        cli_key
            .map(str::to_string)
            .filter(non_blank)
            .or_else(|| env_key.filter(non_blank))
            .or_else(|| self.gemini.api_key.clone())
            .unwrap_or_default()
    }

    pub fn gemini_model(&self) -> &str {
        self.gemini.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn gemini_api_base(&self) -> &str {
        self.gemini.api_base.as_deref().unwrap_or(DEFAULT_GEMINI_API)
    }
}
