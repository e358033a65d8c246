pub mod cli;
pub mod toml_config;

use crate::core::matchmaker::DEFAULT_MAX_ATTEMPTS;
use crate::core::store::DEFAULT_STORE_FILE;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Organise a Secret Santa gift exchange from the terminal")]
pub struct CliConfig {
    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the group store
    #[arg(long)]
    pub data_dir: Option<String>,

    /// File name of the group store inside the data directory
    #[arg(long)]
    pub store_file: Option<String>,

    /// Seed for reproducible matchmaking
    #[arg(long)]
    pub seed: Option<u64>,

    /// Restarts allowed before matchmaking gives up
    #[arg(long)]
    pub max_attempts: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines on stderr")]
    pub log_json: bool,
}

/// Effective settings after layering defaults, the TOML file and command line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SantaSettings {
    pub data_dir: String,
    pub store_file: String,
    pub seed: Option<u64>,
    pub max_attempts: usize,
    pub verbose: bool,
    pub log_json: bool,
}

impl Default for SantaSettings {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            store_file: DEFAULT_STORE_FILE.to_string(),
            seed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            verbose: false,
            log_json: false,
        }
    }
}

impl SantaSettings {
    pub fn with_toml(mut self, toml: &TomlConfig) -> Self {
        if let Some(dir) = toml.data_dir() {
            self.data_dir = dir.to_string();
        }
        if let Some(file) = toml.store_file() {
            self.store_file = file.to_string();
        }
        if let Some(attempts) = toml.max_attempts() {
            self.max_attempts = attempts;
        }
        self.seed = toml.seed().or(self.seed);
        self.verbose |= toml.verbose();
        self.log_json |= toml.json_logs();
        self
    }

    #[cfg(feature = "cli")]
    pub fn with_cli(mut self, cli: &CliConfig) -> Self {
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(file) = &cli.store_file {
            self.store_file = file.clone();
        }
        if let Some(attempts) = cli.max_attempts {
            self.max_attempts = attempts;
        }
        self.seed = cli.seed.or(self.seed);
        self.verbose |= cli.verbose;
        self.log_json |= cli.log_json;
        self
    }

    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(path) = &cli.config {
            let toml = TomlConfig::from_file(path)?;
            toml.validate()?;
            settings = settings.with_toml(&toml);
        }
        Ok(settings.with_cli(cli))
    }
}

impl ConfigProvider for SantaSettings {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn store_file(&self) -> &str {
        &self.store_file
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl Validate for SantaSettings {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_path("store_file", &self.store_file)?;
        validate_positive_number("max_attempts", self.max_attempts, 1)?;
        Ok(())
    }
}
