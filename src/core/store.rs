use crate::domain::model::{Group, Matches, Participant};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SantaError};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORE_FILE: &str = "secret_santa.csv";
pub const GROUP_SCHEMA_VERSION: u32 = 1;

/// One row of the store file. Columns: `user,password,group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "user")]
    pub owner_encoded: String,
    #[serde(rename = "password")]
    pub password_encoded: String,
    #[serde(rename = "group")]
    pub group_blob: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupBlob {
    version: u32,
    saved_at: DateTime<Utc>,
    owner: Option<String>,
    participants: Vec<Participant>,
    matches: Option<Matches>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Reversible text encoding for owner names and passwords. Not a security control.
pub fn encode_credential(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

pub fn decode_credential(encoded: &str) -> Result<String> {
    let bytes = STANDARD.decode(encoded.as_bytes())?;
    String::from_utf8(bytes).map_err(|e| SantaError::CorruptRecord {
        reason: format!("credential is not utf-8: {}", e),
    })
}

/// Groups persisted in a single CSV file, one row per owner.
pub struct GroupStore<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> GroupStore<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    /// Replaces the row for `owner` in place, or appends one, then rewrites the file.
    pub fn save(&self, owner: &str, password: &str, group: &Group) -> Result<SaveOutcome> {
        let record = StoredRecord {
            owner_encoded: encode_credential(owner),
            password_encoded: encode_credential(password),
            group_blob: encode_group(owner, group)?,
        };

        let mut records = self.records()?;
        let outcome = match records
            .iter_mut()
            .find(|r| r.owner_encoded == record.owner_encoded)
        {
            Some(existing) => {
                *existing = record;
                SaveOutcome::Updated
            }
            None => {
                records.push(record);
                SaveOutcome::Inserted
            }
        };

        self.write_records(&records)?;
        tracing::info!(
            "Saved group for {} ({:?}, {} participants, {} stored groups)",
            owner,
            outcome,
            group.len(),
            records.len()
        );
        Ok(outcome)
    }

    /// First row whose owner and password both match.
    pub fn load(&self, owner: &str, password: &str) -> Result<Group> {
        let owner_encoded = encode_credential(owner);
        let password_encoded = encode_credential(password);

        let record = self
            .records()?
            .into_iter()
            .find(|r| r.owner_encoded == owner_encoded && r.password_encoded == password_encoded)
            .ok_or_else(|| SantaError::NotFound {
                owner: owner.to_string(),
            })?;

        let group = decode_group(&record.group_blob)?;
        tracing::info!("Loaded group for {} ({} participants)", owner, group.len());
        Ok(group)
    }

    /// All rows in file order. A store that does not exist yet is empty.
    pub fn records(&self) -> Result<Vec<StoredRecord>> {
        let data = match self.storage.read_file(&self.file_name) {
            Ok(data) => data,
            Err(SantaError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Store {} does not exist yet", self.file_name);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut reader = csv::Reader::from_reader(data.as_slice());
        let mut records: Vec<StoredRecord> = Vec::new();
        for row in reader.deserialize() {
            let record: StoredRecord = row?;
            decode_credential(&record.owner_encoded)?;
            decode_credential(&record.password_encoded)?;
            records.push(record);
        }
        Ok(records)
    }

    fn write_records(&self, records: &[StoredRecord]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(["user", "password", "group"])?;
        for record in records {
            writer.serialize(record)?;
        }

        let data = writer.into_inner().map_err(|e| e.into_error())?;
        self.storage.write_file(&self.file_name, &data)
    }
}

fn encode_group(owner: &str, group: &Group) -> Result<String> {
    let blob = GroupBlob {
        version: GROUP_SCHEMA_VERSION,
        saved_at: Utc::now(),
        owner: Some(group.owner().unwrap_or(owner).to_string()),
        participants: group.participants().to_vec(),
        matches: group.matches().cloned(),
    };
    Ok(serde_json::to_string(&blob)?)
}

fn decode_group(blob: &str) -> Result<Group> {
    let blob: GroupBlob = serde_json::from_str(blob)?;
    if blob.version != GROUP_SCHEMA_VERSION {
        return Err(SantaError::UnsupportedSchemaVersion {
            found: blob.version,
            supported: GROUP_SCHEMA_VERSION,
        });
    }

    let mut group = Group::new();
    if let Some(owner) = &blob.owner {
        group.claim_owner(owner);
    }
    for participant in blob.participants {
        group.insert(participant).map_err(|e| SantaError::CorruptRecord {
            reason: e.to_string(),
        })?;
    }
    if let Some(matches) = blob.matches {
        group.set_matches(matches)?;
    }

    tracing::debug!("Decoded group saved at {}", blob.saved_at);
    Ok(group)
}
