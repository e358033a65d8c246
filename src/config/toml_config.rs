use crate::utils::error::{Result, SantaError};
use crate::utils::validation::Validate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// Optional settings file. Every section and key may be omitted.
///
/// ```toml
/// [store]
/// data_dir = "${HOME}/.secret-santa"
/// file = "secret_santa.csv"
///
/// [matchmaking]
/// max_attempts = 1000
/// seed = 7
///
/// [logging]
/// verbose = false
/// json = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub store: Option<StoreConfig>,
    pub matchmaking: Option<MatchmakingConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub data_dir: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchmakingConfig {
    pub max_attempts: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn data_dir(&self) -> Option<&str> {
        self.store.as_ref().and_then(|s| s.data_dir.as_deref())
    }

    pub fn store_file(&self) -> Option<&str> {
        self.store.as_ref().and_then(|s| s.file.as_deref())
    }

    pub fn max_attempts(&self) -> Option<usize> {
        self.matchmaking.as_ref().and_then(|m| m.max_attempts)
    }

    pub fn seed(&self) -> Option<u64> {
        self.matchmaking.as_ref().and_then(|m| m.seed)
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(dir) = self.data_dir() {
            crate::utils::validation::validate_path("store.data_dir", dir)?;
        }
        if let Some(file) = self.store_file() {
            crate::utils::validation::validate_path("store.file", file)?;
        }
        if let Some(attempts) = self.max_attempts() {
            crate::utils::validation::validate_positive_number(
                "matchmaking.max_attempts",
                attempts,
                1,
            )?;
        }
        Ok(())
    }
}
