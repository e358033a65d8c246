use crate::core::importer::ParticipantImporter;
use crate::core::matchmaker::Matchmaker;
use crate::core::store::{GroupStore, SaveOutcome};
use crate::domain::model::{Group, Participant};
use crate::domain::ports::Storage;
use crate::utils::error::{ErrorSeverity, Result, SantaError};
use crate::utils::validation::{
    validate_name, validate_non_empty_string, validate_phone_number, validate_txt_file,
};
use rand::rngs::StdRng;
use rand::Rng;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    AddParticipants,
    ViewParticipants,
    MatchMake,
    Save,
    Load,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 6] = [
        MenuOption::AddParticipants,
        MenuOption::ViewParticipants,
        MenuOption::MatchMake,
        MenuOption::Save,
        MenuOption::Load,
        MenuOption::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::AddParticipants => "Add participants",
            MenuOption::ViewParticipants => "View participants",
            MenuOption::MatchMake => "Match make",
            MenuOption::Save => "Save",
            MenuOption::Load => "Load",
            MenuOption::Exit => "Exit",
        }
    }

    /// Parses a 1-based menu number. Anything that is not an in-range integer is `None`.
    pub fn from_selection(input: &str) -> Option<Self> {
        let number: usize = input.trim().parse().ok()?;
        Self::ALL.get(number.checked_sub(1)?).copied()
    }
}

/// Menu-driven workflow over one active group.
pub struct SantaSession<R: BufRead, W: Write, S: Storage, G: Rng = StdRng> {
    input: R,
    output: W,
    store: GroupStore<S>,
    matchmaker: Matchmaker<G>,
    group: Group,
    password: Option<String>,
}

impl<R: BufRead, W: Write, S: Storage, G: Rng> SantaSession<R, W, S, G> {
    pub fn new(input: R, output: W, store: GroupStore<S>, matchmaker: Matchmaker<G>) -> Self {
        Self {
            input,
            output,
            store,
            matchmaker,
            group: Group::new(),
            password: None,
        }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Runs until Exit is chosen or input ends. Per-operation errors are reported and
    /// the menu comes back; only a broken output stream ends the loop with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;

            let option = match self.read_menu_option() {
                Ok(option) => option,
                Err(SantaError::InputClosed) => {
                    tracing::info!("Input closed, leaving session");
                    break;
                }
                Err(e) => return Err(e),
            };

            if option == MenuOption::Exit {
                self.say("Goodbye")?;
                break;
            }

            tracing::debug!("Selected menu option {:?}", option);
            match self.dispatch(option) {
                Ok(()) => {}
                Err(SantaError::InputClosed) => {
                    tracing::info!("Input closed during {:?}, leaving session", option);
                    break;
                }
                Err(e) => self.report(&e)?,
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, option: MenuOption) -> Result<()> {
        match option {
            MenuOption::AddParticipants => self.add_participants(),
            MenuOption::ViewParticipants => self.view_participants(),
            MenuOption::MatchMake => self.match_make(),
            MenuOption::Save => self.save(),
            MenuOption::Load => self.load_group(),
            MenuOption::Exit => Ok(()),
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        self.say("Welcome to Secret Santa")?;
        self.say("Please select an option:")?;
        for (idx, option) in MenuOption::ALL.iter().enumerate() {
            self.say(&format!("{}. {}", idx + 1, option.label()))?;
        }
        Ok(())
    }

    fn read_menu_option(&mut self) -> Result<MenuOption> {
        loop {
            let line = self.read_line()?;
            match MenuOption::from_selection(&line) {
                Some(option) => return Ok(option),
                None => {
                    tracing::debug!("Rejected menu selection {:?}", line);
                    self.say("Not a valid choice")?;
                }
            }
        }
    }

    fn add_participants(&mut self) -> Result<()> {
        self.say("How would you like to upload names?")?;
        self.say("Enter txt for a text file or manual to do it manually")?;
        let choice = self.read_line()?;

        if choice.trim().eq_ignore_ascii_case("txt") {
            self.import_participants()
        } else {
            self.add_manual_participants()
        }
    }

    fn import_participants(&mut self) -> Result<()> {
        let path = self.prompt_validated("Please enter the file name", validate_txt_file)?;
        let summary = ParticipantImporter::import_file(&path, &mut self.group)?;

        self.say(&format!(
            "Added {} participants ({} duplicates skipped, {} malformed lines skipped)",
            summary.added, summary.duplicates, summary.malformed
        ))
    }

    fn add_manual_participants(&mut self) -> Result<()> {
        loop {
            let name = self.prompt_validated("What is the name of the participant?", validate_name)?;
            let number =
                self.prompt_validated("What is their phone number?", validate_phone_number)?;

            match self.group.insert(Participant::new(name, number)) {
                Ok(()) => {}
                Err(e @ SantaError::DuplicateParticipant { .. }) => {
                    self.say(&e.user_friendly_message())?;
                    continue;
                }
                Err(e) => return Err(e),
            }

            self.say("Would you like to enter another participant?")?;
            let answer = self.read_line()?;
            if matches!(answer.trim_start().chars().next(), Some('n' | 'N')) {
                return Ok(());
            }
        }
    }

    fn view_participants(&mut self) -> Result<()> {
        if !self.group.has_participants() {
            return self.say("There are no participants currently");
        }

        let lines: Vec<String> = self
            .group
            .participants()
            .iter()
            .map(|p| match self.group.recipient_of(p.name()) {
                Some(receiver) => format!("{} -> {}", p.name(), receiver),
                None => p.name().to_string(),
            })
            .collect();

        for line in lines {
            self.say(&line)?;
        }
        Ok(())
    }

    fn match_make(&mut self) -> Result<()> {
        if self.group.len() < 2 {
            return self.say("You need some participants first");
        }

        let names = self.group.participant_names();
        let matches = self.matchmaker.assign(&names)?;
        self.group.set_matches(matches)?;
        self.say(&format!("Matched {} participants", names.len()))
    }

    fn save(&mut self) -> Result<()> {
        let owner = match self.group.owner().map(str::to_string) {
            Some(owner) => owner,
            None => {
                let owner = self.prompt_validated("Please enter a username", |v| {
                    validate_non_empty_string("username", v)
                })?;
                self.group.claim_owner(&owner).to_string()
            }
        };

        let password = match self.password.clone() {
            Some(password) => password,
            None => {
                let password =
                    self.prompt_validated("Please enter a password for your group", |v| {
                        validate_non_empty_string("password", v)
                    })?;
                self.password = Some(password.clone());
                password
            }
        };

        match self.store.save(&owner, &password, &self.group)? {
            SaveOutcome::Inserted => tracing::debug!("Created stored group for {}", owner),
            SaveOutcome::Updated => tracing::debug!("Replaced stored group for {}", owner),
        }
        self.say("Successfully saved group")
    }

    fn load_group(&mut self) -> Result<()> {
        self.say("Please enter your username")?;
        let owner = self.read_line()?.trim().to_string();
        self.say("Please enter the password for your group")?;
        let password = self.read_line()?.trim().to_string();

        match self.store.load(&owner, &password) {
            Ok(group) => {
                self.group = group;
                self.password = Some(password);
                self.say("Successfully loaded group")
            }
            Err(e @ SantaError::NotFound { .. }) => {
                tracing::info!("{}", e);
                self.say(&e.user_friendly_message())
            }
            Err(e) => Err(e),
        }
    }

    fn report(&mut self, error: &SantaError) -> Result<()> {
        tracing::warn!(
            "{} (category: {:?}, severity: {:?})",
            error,
            error.category(),
            error.severity()
        );
        self.say(&error.user_friendly_message())?;
        if error.severity() >= ErrorSeverity::High {
            self.say(error.recovery_suggestion())?;
        }
        Ok(())
    }

    /// Repeats the prompt until `validate` accepts the trimmed input.
    fn prompt_validated<F>(&mut self, message: &str, validate: F) -> Result<String>
    where
        F: Fn(&str) -> Result<()>,
    {
        self.say(message)?;
        loop {
            let line = self.read_line()?;
            let value = line.trim();
            match validate(value) {
                Ok(()) => return Ok(value.to_string()),
                Err(e) => {
                    tracing::debug!("{}", e);
                    self.say(&e.user_friendly_message())?;
                }
            }
        }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SantaError::InputClosed);
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                SantaError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn session(
        script: &str,
        storage: MockStorage,
    ) -> SantaSession<Cursor<Vec<u8>>, Vec<u8>, MockStorage> {
        SantaSession::new(
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            GroupStore::new(storage, "santa.csv"),
            Matchmaker::from_seed(7),
        )
    }

    fn output_of<G: Rng>(session: &SantaSession<Cursor<Vec<u8>>, Vec<u8>, MockStorage, G>) -> String {
        String::from_utf8_lossy(session.output()).into_owned()
    }

    #[test]
    fn test_menu_selection_parsing() {
        assert_eq!(MenuOption::from_selection("1"), Some(MenuOption::AddParticipants));
        assert_eq!(MenuOption::from_selection(" 6 "), Some(MenuOption::Exit));
        assert_eq!(MenuOption::from_selection("0"), None);
        assert_eq!(MenuOption::from_selection("7"), None);
        assert_eq!(MenuOption::from_selection("six"), None);
        assert_eq!(MenuOption::from_selection(""), None);
    }

    #[test]
    fn test_exit_says_goodbye() {
        let mut session = session("6\n", MockStorage::default());
        session.run().unwrap();

        let output = output_of(&session);
        assert!(output.starts_with("Welcome to Secret Santa\nPlease select an option:\n1. Add participants"));
        assert!(output.trim_end().ends_with("Goodbye"));
    }

    #[test]
    fn test_non_numeric_selection_reprompts() {
        let mut session = session("abc\n9\n6\n", MockStorage::default());
        session.run().unwrap();

        let output = output_of(&session);
        assert_eq!(output.matches("Not a valid choice").count(), 2);
        assert!(output.contains("Goodbye"));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let mut session = session("2\n", MockStorage::default());
        session.run().unwrap();
        assert!(output_of(&session).contains("There are no participants currently"));
    }

    #[test]
    fn test_manual_entry_validates_and_dedups() {
        let script = "1\nmanual\nAl1ce\nAlice\n555\n555-111-2222\ny\nAlice\n555-111-2222\nBob\n555-333-4444\nn\n6\n";
        let mut session = session(script, MockStorage::default());
        session.run().unwrap();

        let output = output_of(&session);
        assert!(output.contains("Not a valid name"));
        assert!(output.contains("Not a valid number"));
        assert!(output.contains("You've already added this participant"));
        assert_eq!(session.group().participant_names(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_match_make_needs_two_participants() {
        let script = "3\n1\nmanual\nAlice\n555-111-2222\nn\n3\n6\n";
        let mut session = session(script, MockStorage::default());
        session.run().unwrap();

        let output = output_of(&session);
        assert_eq!(output.matches("You need some participants first").count(), 2);
        assert!(session.group().matches().is_none());
    }

    #[test]
    fn test_match_make_and_view() {
        let script = "1\nmanual\nAlice\n555-111-2222\ny\nBob\n555-333-4444\nn\n3\n2\n6\n";
        let mut session = session(script, MockStorage::default());
        session.run().unwrap();

        assert_eq!(session.group().recipient_of("Alice"), Some("Bob"));
        assert_eq!(session.group().recipient_of("Bob"), Some("Alice"));
        let output = output_of(&session);
        assert!(output.contains("Matched 2 participants"));
        assert!(output.contains("Alice -> Bob"));
        assert!(output.contains("Bob -> Alice"));
    }

    #[test]
    fn test_save_prompts_credentials_once() {
        let storage = MockStorage::default();
        let script = "1\nmanual\nAlice\n555-111-2222\nn\n4\nalice\nsecret\n4\n6\n";
        let mut session = session(script, storage.clone());
        session.run().unwrap();

        let output = output_of(&session);
        assert_eq!(output.matches("Please enter a username").count(), 1);
        assert_eq!(output.matches("Please enter a password for your group").count(), 1);
        assert_eq!(output.matches("Successfully saved group").count(), 2);

        let store = GroupStore::new(storage, "santa.csv");
        assert_eq!(store.records().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_current_group() {
        let script = "1\nmanual\nAlice\n555-111-2222\nn\n5\nnobody\nwrong\n6\n";
        let mut session = session(script, MockStorage::default());
        session.run().unwrap();

        assert!(output_of(&session).contains("Sorry. Couldn't find that group"));
        assert_eq!(session.group().participant_names(), vec!["Alice"]);
    }

    #[test]
    fn test_load_replaces_group() {
        let storage = MockStorage::default();
        let mut saved = Group::new();
        saved.add(Participant::new("Carol", "555-555-6666"));
        saved.add(Participant::new("Dave", "555-777-8888"));
        GroupStore::new(storage.clone(), "santa.csv")
            .save("carol", "pw", &saved)
            .unwrap();

        let mut session = session("5\ncarol\npw\n2\n6\n", storage);
        session.run().unwrap();

        assert!(output_of(&session).contains("Successfully loaded group"));
        assert_eq!(session.group().owner(), Some("carol"));
        assert_eq!(session.group().participant_names(), vec!["Carol", "Dave"]);
    }

    #[test]
    fn test_matchmaking_failure_is_reported_and_matches_stay_unset() {
        // An all-zero RNG pairs Ann and Ben with each other and leaves Cat stuck every time.
        let script = "1\nmanual\nAnn\n555-111-2222\ny\nBen\n555-333-4444\ny\nCat\n555-555-6666\nn\n3\n2\n6\n";
        let mut session = SantaSession::new(
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
            GroupStore::new(MockStorage::default(), "santa.csv"),
            Matchmaker::new(StepRng::new(0, 0)).with_max_attempts(3),
        );
        session.run().unwrap();

        let output = output_of(&session);
        assert!(output.contains("Could not find a valid matching after 3 attempts"));
        assert!(!output.contains("Ann -> "));
        assert!(output.trim_end().ends_with("Goodbye"));
        assert!(session.group().matches().is_none());
        assert_eq!(session.group().len(), 3);
    }
}
