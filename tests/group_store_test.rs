use anyhow::Result;
use secret_santa::core::store::encode_credential;
use secret_santa::{Group, GroupStore, LocalStorage, Matchmaker, Participant, SantaError, SaveOutcome};
use tempfile::TempDir;

fn store_in(temp_dir: &TempDir) -> GroupStore<LocalStorage> {
    GroupStore::new(LocalStorage::new(temp_dir.path()), "secret_santa.csv")
}

fn two_person_group() -> Group {
    let mut group = Group::new();
    group.add(Participant::new("Alice", "555-111-2222"));
    group.add(Participant::new("Bob", "555-333-4444"));
    group
}

#[test]
fn test_save_then_load_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = store_in(&temp_dir);

    let mut group = two_person_group();
    let matches = Matchmaker::from_seed(11).assign(&group.participant_names())?;
    group.set_matches(matches)?;

    store.save("alice", "secret", &group)?;
    let loaded = store.load("alice", "secret")?;

    assert_eq!(loaded.participants(), group.participants());
    assert_eq!(loaded.matches(), group.matches());
    assert_eq!(loaded.owner(), Some("alice"));
    Ok(())
}

#[test]
fn test_wrong_password_is_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = store_in(&temp_dir);
    store.save("alice", "secret", &two_person_group())?;

    assert!(matches!(
        store.load("alice", "wrong"),
        Err(SantaError::NotFound { .. })
    ));
    assert!(matches!(
        store.load("mallory", "secret"),
        Err(SantaError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_second_save_replaces_record() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = store_in(&temp_dir);
    let mut group = two_person_group();

    assert_eq!(store.save("alice", "secret", &group)?, SaveOutcome::Inserted);
    group.add(Participant::new("Carol", "555-555-6666"));
    assert_eq!(store.save("alice", "secret", &group)?, SaveOutcome::Updated);

    let records = store.records()?;
    let alice_rows = records
        .iter()
        .filter(|r| r.owner_encoded == encode_credential("alice"))
        .count();
    assert_eq!(alice_rows, 1);
    assert_eq!(store.load("alice", "secret")?.len(), 3);
    Ok(())
}

#[test]
fn test_store_file_is_readable_csv() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = store_in(&temp_dir);
    store.save("alice", "secret", &two_person_group())?;
    store.save("bob", "hunter2", &Group::new())?;

    let content = std::fs::read_to_string(temp_dir.path().join("secret_santa.csv"))?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    assert_eq!(headers, vec!["user", "password", "group"]);
    assert_eq!(reader.records().count(), 2);
    Ok(())
}

#[test]
fn test_store_survives_new_instance() -> Result<()> {
    let temp_dir = TempDir::new()?;
    store_in(&temp_dir).save("alice", "secret", &two_person_group())?;

    let reopened = store_in(&temp_dir);
    assert_eq!(reopened.load("alice", "secret")?.len(), 2);
    Ok(())
}
