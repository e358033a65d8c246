use anyhow::Context;
use clap::Parser;
use secret_santa::domain::ports::ConfigProvider;
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{CliConfig, GroupStore, LocalStorage, Matchmaker, SantaSession, SantaSettings};
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // Load and validate settings
    let settings = match SantaSettings::from_cli(&cli).and_then(|settings| {
        settings.validate()?;
        Ok(settings)
    }) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if settings.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(settings.verbose);
    }

    tracing::info!("Starting secret-santa");
    tracing::debug!("Settings: {:?}", settings);

    let storage = LocalStorage::new(settings.data_dir());
    let store = GroupStore::new(storage, settings.store_file());
    let matchmaker = match settings.seed() {
        Some(seed) => Matchmaker::from_seed(seed),
        None => Matchmaker::from_entropy(),
    }
    .with_max_attempts(settings.max_attempts());

    let stdin = io::stdin();
    let mut session = SantaSession::new(stdin.lock(), io::stdout(), store, matchmaker);
    session.run().context("interactive session failed")?;

    tracing::info!("Session finished");
    Ok(())
}
