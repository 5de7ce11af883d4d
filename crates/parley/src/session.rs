//! Interpreter session: one utterance in, one response out.
//!
//! The session owns the whole pipeline (matcher → builder → registry) and the
//! conversation history. Input and output are injected capabilities so the
//! surrounding process decides where utterances come from (stdin, a speech
//! transcriber) and where responses go (display, speech synthesis).

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::nlu::Command;
use crate::nlu::CommandBuilder;
use crate::nlu::IntentMatcher;
use crate::registry::DeviceRegistry;
use crate::registry::RegistryError;

/// Utterances that end the session outright, matched case-insensitively
/// after trimming, before intent classification runs.
pub const EXIT_PHRASES: &[&str] = &[
    "exit",
    "quit",
    "goodbye",
    "bye",
    "bye-bye",
    "thank you",
    "thanks",
    "appreciate it",
    "thanks a lot",
];

pub const SESSION_GREETING: &str = "Hello! I'm your virtual assistant. How can I help you today?";
pub const SESSION_FAREWELL: &str = "Goodbye! Have a great day!";

/// What a handled utterance produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Respond and keep listening.
    Reply(String),
    /// Respond and end the session.
    Farewell(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One conversation turn.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

pub struct Session {
    matcher: IntentMatcher,
    builder: CommandBuilder,
    registry: DeviceRegistry,
    history: Vec<HistoryEntry>,
}

impl Session {
    pub fn new(builder: CommandBuilder, registry: DeviceRegistry) -> Self {
        Self {
            matcher: IntentMatcher::new(),
            builder,
            registry,
            history: Vec::new(),
        }
    }

    /// Handle one utterance end to end.
    ///
    /// Exit phrases short-circuit before classification. Everything else is
    /// classified, built into a command, and applied; registry rejections
    /// come back as response text, never as errors.
    pub fn handle_utterance(&mut self, utterance: &str) -> Outcome {
        self.remember(Role::User, utterance);

        if is_exit_phrase(utterance) {
            debug!(%utterance, "exit phrase, ending session");
            self.remember(Role::Assistant, SESSION_FAREWELL);
            return Outcome::Farewell(SESSION_FAREWELL.to_string());
        }

        let classification = self.matcher.classify(utterance);
        info!(intent = %classification.intent, "utterance classified");

        let command = self.builder.build(classification.intent, utterance);
        let response = self.apply(command);

        self.remember(Role::Assistant, &response);
        Outcome::Reply(response)
    }

    /// Conversation so far, user and assistant turns interleaved.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Drive the session loop: greet, then handle utterances until an exit
    /// phrase or until `input` is exhausted.
    pub fn run(
        &mut self,
        mut input: impl FnMut() -> Option<String>,
        mut output: impl FnMut(&str),
    ) {
        output(SESSION_GREETING);

        while let Some(utterance) = input() {
            if utterance.trim().is_empty() {
                continue;
            }
            match self.handle_utterance(&utterance) {
                Outcome::Reply(response) => output(&response),
                Outcome::Farewell(response) => {
                    output(&response);
                    break;
                }
            }
        }
    }

    fn apply(&mut self, command: Command) -> String {
        let result = match command {
            Command::Respond(text) => return text,
            Command::LightControl {
                room,
                op,
                brightness,
                color,
            } => self
                .registry
                .set_light(&room, op, brightness, color.as_deref()),
            Command::LightStatus(room) => self.registry.light_status(room.as_deref()),
            Command::SetAlarm(time) => self.registry.set_alarm(&time),
            Command::ListAlarms => Ok(self.registry.list_alarms()),
            Command::ClearAlarms => self
                .registry
                .clear_alarms()
                .map(|count| format!("Cleared {count} alarms")),
        };

        result.unwrap_or_else(rejection_text)
    }

    fn remember(&mut self, role: Role, content: &str) {
        self.history.push(HistoryEntry {
            role,
            content: content.to_string(),
        });
    }
}

fn is_exit_phrase(utterance: &str) -> bool {
    let trimmed = utterance.trim().to_lowercase();
    EXIT_PHRASES.contains(&trimmed.as_str())
}

/// Convert a registry rejection into spoken text. Store failures are the one
/// case that is logged as an error rather than explained to the user.
fn rejection_text(error: RegistryError) -> String {
    match error {
        RegistryError::UnknownRoom(room) => {
            format!("I couldn't find any lights in the {room}")
        }
        RegistryError::InvalidTimeFormat(_) => {
            "Please specify the time in HH:MM format".to_string()
        }
        RegistryError::UnsupportedOperation { .. } => {
            "Can't perform that light command".to_string()
        }
        RegistryError::BrightnessOutOfRange(_) => {
            "Brightness needs to be between 0 and 100 percent".to_string()
        }
        RegistryError::Store(e) => {
            error!("failed to persist device state: {e}");
            "Something went wrong saving your devices".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlu::Chooser;
    use crate::nlu::Clock;
    use crate::registry::MemoryStore;
    use crate::registry::PowerState;

    struct FirstChooser;

    impl Chooser for FirstChooser {
        fn pick(&mut self, _len: usize) -> usize {
            0
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> chrono::DateTime<chrono::Local> {
            use chrono::TimeZone;
            chrono::Local.with_ymd_and_hms(2024, 3, 1, 19, 30, 0).unwrap()
        }
    }

    fn session() -> Session {
        let builder = CommandBuilder::new(Box::new(FirstChooser), Box::new(FixedClock));
        let registry = DeviceRegistry::open(Box::new(MemoryStore::new())).unwrap();
        Session::new(builder, registry)
    }

    fn reply(session: &mut Session, utterance: &str) -> String {
        match session.handle_utterance(utterance) {
            Outcome::Reply(text) => text,
            Outcome::Farewell(text) => panic!("unexpected farewell: {text}"),
        }
    }

    #[test]
    fn test_turn_on_living_room_end_to_end() {
        let mut session = session();
        let response = reply(&mut session, "turn on the living room lights");
        assert_eq!(response, "living room lights turned on");
        assert_eq!(
            session.registry().state().lights["living_room"].state,
            PowerState::On
        );

        let status = reply(&mut session, "how are the living room lights");
        assert!(status.contains("living room lights are on"));
    }

    #[test]
    fn test_dim_end_to_end() {
        let mut session = session();
        reply(&mut session, "dim the bedroom lights to 40%");
        let light = &session.registry().state().lights["bedroom"];
        assert_eq!(light.brightness, 40);
        assert_eq!(light.state, PowerState::On);
    }

    #[test]
    fn test_alarm_flow() {
        let mut session = session();
        assert_eq!(
            reply(&mut session, "set an alarm for 7:30 pm"),
            "Alarm set for 19:30"
        );
        assert_eq!(
            reply(&mut session, "wake me up at 6:00"),
            "Alarm set for 06:00"
        );

        let listing = reply(&mut session, "what alarms are set");
        assert_eq!(listing, "Your alarms: 19:30, 06:00");

        assert_eq!(reply(&mut session, "clear all alarms"), "Cleared 2 alarms");
        assert_eq!(
            reply(&mut session, "list alarms"),
            "You have no alarms set"
        );
    }

    #[test]
    fn test_exit_phrase_bypasses_classification() {
        // "thanks" would classify as gratitude, which replies and keeps the
        // session going; the exit check must win first.
        let mut session = session();
        assert_eq!(
            session.handle_utterance("thanks"),
            Outcome::Farewell(SESSION_FAREWELL.to_string())
        );
        assert_eq!(
            session.handle_utterance("  QUIT  "),
            Outcome::Farewell(SESSION_FAREWELL.to_string())
        );
    }

    #[test]
    fn test_unknown_utterance() {
        let mut session = session();
        assert_eq!(
            reply(&mut session, "asdkjasd"),
            "I'm not sure I understand. Try asking for help to see what I can do."
        );
    }

    #[test]
    fn test_unknown_room_rejection_is_spoken() {
        let mut session = session();
        // "bathroom" resolves (it's in the vocabulary) but is not registered.
        assert_eq!(
            reply(&mut session, "turn on the bathroom lights"),
            "I couldn't find any lights in the bathroom"
        );
    }

    #[test]
    fn test_out_of_range_brightness_is_spoken() {
        let mut session = session();
        assert_eq!(
            reply(&mut session, "dim the kitchen lights to 150%"),
            "Brightness needs to be between 0 and 100 percent"
        );
    }

    #[test]
    fn test_history_records_both_roles() {
        let mut session = session();
        reply(&mut session, "hello");
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[test]
    fn test_run_loop_greets_and_stops_on_exit() {
        let mut session = session();
        let utterances = vec!["turn on the kitchen lights", "bye"];
        let mut remaining = utterances.into_iter();
        let mut spoken = Vec::new();

        session.run(
            || remaining.next().map(str::to_string),
            |text| spoken.push(text.to_string()),
        );

        assert_eq!(spoken[0], SESSION_GREETING);
        assert_eq!(spoken[1], "kitchen lights turned on");
        assert_eq!(spoken[2], SESSION_FAREWELL);
        assert_eq!(spoken.len(), 3);
    }
}
