pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, SantaSettings};

pub use core::{
    importer::{ImportSummary, ParticipantImporter},
    matchmaker::Matchmaker,
    session::SantaSession,
    store::{GroupStore, SaveOutcome},
};
pub use domain::model::{Group, Matches, Participant};
pub use utils::error::{Result, SantaError};
