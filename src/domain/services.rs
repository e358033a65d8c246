use crate::domain::model::Participant;

/// Dedup rule shared by manual entry and file import: exact `(name, contact)` match.
pub fn is_unique_participant(participants: &[Participant], candidate: &Participant) -> bool {
    !participants
        .iter()
        .any(|p| p.name() == candidate.name() && p.contact() == candidate.contact())
}
