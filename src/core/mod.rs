pub mod importer;
pub mod matchmaker;
pub mod session;
pub mod store;
