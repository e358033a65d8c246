use crate::domain::model::{Group, Participant};
use crate::utils::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

/// Reads `name,contact` lines into a group. No header, blank lines ignored.
pub struct ParticipantImporter;

impl ParticipantImporter {
    pub fn import_file<P: AsRef<Path>>(path: P, group: &mut Group) -> Result<ImportSummary> {
        let path = path.as_ref();
        tracing::debug!("Importing participants from {}", path.display());
        let file = File::open(path)?;
        Self::import_reader(file, group)
    }

    pub fn import_str(content: &str, group: &mut Group) -> Result<ImportSummary> {
        Self::import_reader(content.as_bytes(), group)
    }

    pub fn import_reader<R: Read>(reader: R, group: &mut Group) -> Result<ImportSummary> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut summary = ImportSummary::default();

        // Byte records so a line with invalid UTF-8 is skipped instead of ending the import.
        for record in csv_reader.byte_records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let field = |idx: usize| {
                record
                    .get(idx)
                    .and_then(|raw| std::str::from_utf8(raw).ok())
                    .filter(|value| !value.is_empty())
            };

            let (name, contact) = match (field(0), field(1)) {
                (Some(name), Some(contact)) => (name, contact),
                _ => {
                    tracing::warn!("Skipping malformed participant on line {}", line);
                    summary.malformed += 1;
                    continue;
                }
            };

            if group.add(Participant::new(name, contact)) {
                summary.added += 1;
            } else {
                tracing::debug!("Skipping duplicate participant {} on line {}", name, line);
                summary.duplicates += 1;
            }
        }

        tracing::info!(
            "Imported {} participants ({} duplicates, {} malformed)",
            summary.added,
            summary.duplicates,
            summary.malformed
        );
        Ok(summary)
    }
}
