use crate::domain::services::is_unique_participant;
use crate::utils::error::{Result, SantaError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Giver name to receiver name.
pub type Matches = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    name: String,
    contact: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }
}

/// The gift-exchange group a session works on.
///
/// Participants keep insertion order and are unique by `(name, contact)`.
/// When present, `matches` covers every participant name exactly once as giver
/// and once as receiver, and never maps a name to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    owner: Option<String>,
    participants: Vec<Participant>,
    matches: Option<Matches>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the same `(name, contact)` pair is already present.
    pub fn add(&mut self, participant: Participant) -> bool {
        self.insert(participant).is_ok()
    }

    pub fn insert(&mut self, participant: Participant) -> Result<()> {
        if !is_unique_participant(&self.participants, &participant) {
            return Err(SantaError::DuplicateParticipant {
                name: participant.name,
                contact: participant.contact,
            });
        }

        // A mapping computed before this participant joined is no longer total.
        if self.matches.take().is_some() {
            tracing::debug!("Cleared previous matches after adding {}", participant.name);
        }
        self.participants.push(participant);
        Ok(())
    }

    pub fn has_participants(&self) -> bool {
        !self.participants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant_names(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }

    pub fn matches(&self) -> Option<&Matches> {
        self.matches.as_ref()
    }

    pub fn recipient_of(&self, giver: &str) -> Option<&str> {
        self.matches
            .as_ref()
            .and_then(|m| m.get(giver))
            .map(String::as_str)
    }

    pub fn set_matches(&mut self, matches: Matches) -> Result<()> {
        check_matches(&self.participant_names(), &matches)?;
        self.matches = Some(matches);
        Ok(())
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Sets the owner only if none is recorded yet and returns the effective owner.
    pub fn claim_owner(&mut self, owner: &str) -> &str {
        self.owner.get_or_insert_with(|| owner.to_string())
    }
}

fn check_matches(names: &[String], matches: &Matches) -> Result<()> {
    let corrupt = |reason: String| SantaError::CorruptRecord { reason };

    let givers: HashSet<&str> = names.iter().map(String::as_str).collect();
    if givers.len() != names.len() || matches.len() != names.len() {
        return Err(corrupt(format!(
            "matches cover {} givers but the group has {} distinct of {} participants",
            matches.len(),
            givers.len(),
            names.len()
        )));
    }

    let mut receivers = HashSet::new();
    for (giver, receiver) in matches {
        if !givers.contains(giver.as_str()) || !givers.contains(receiver.as_str()) {
            return Err(corrupt(format!(
                "match {} -> {} names an unknown participant",
                giver, receiver
            )));
        }
        if giver == receiver {
            return Err(corrupt(format!("{} is matched with themself", giver)));
        }
        if !receivers.insert(receiver.as_str()) {
            return Err(corrupt(format!("{} receives more than one gift", receiver)));
        }
    }

    Ok(())
}
