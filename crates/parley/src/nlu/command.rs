//! Turns a classified utterance into a structured [`Command`].
//!
//! Conversational intents become canned [`Command::Respond`] text; domain
//! intents get their slots extracted from the raw utterance (room and color
//! via the resolver, time via the normalizer) and become registry commands.
//! Extraction failures never escape as errors, they become failure responses.

use chrono::DateTime;
use chrono::Local;
use rand::Rng;
use regex::Regex;

use super::intent::Intent;
use super::resolver;
use super::time;
use crate::registry::LightOp;

/// Structured result of processing one utterance. Exactly one per utterance.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Speak a response; the registry is not involved.
    Respond(String),
    LightControl {
        room: String,
        op: LightOp,
        brightness: Option<u8>,
        color: Option<String>,
    },
    /// Status for one room, or all rooms when `None`.
    LightStatus(Option<String>),
    /// Time is already canonical `HH:MM`.
    SetAlarm(String),
    ListAlarms,
    ClearAlarms,
}

/// Selection capability for the canned response tables, injectable so tests
/// can pin the choice.
pub trait Chooser {
    /// Pick an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random selection.
pub struct RandomChooser;

impl Chooser for RandomChooser {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Wall-clock capability for time/date query responses.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

pub const GREETING_RESPONSES: &[&str] = &[
    "Hello! How can I help you today?",
    "Hi there! What can I do for you?",
    "Greetings! How may I assist you?",
    "Hello! I'm listening.",
    "Hi! What would you like me to do?",
];

pub const FAREWELL_RESPONSES: &[&str] = &[
    "Goodbye! Have a great day!",
    "See you later!",
    "Bye for now! Let me know if you need anything else.",
    "Take care!",
    "Until next time!",
];

pub const GRATITUDE_RESPONSES: &[&str] = &[
    "You're welcome!",
    "Happy to help!",
    "Anytime!",
    "My pleasure!",
    "Glad I could assist!",
];

pub const WEATHER_RESPONSE: &str =
    "I'm sorry, I don't have access to weather information in this demo.";

pub const UNKNOWN_RESPONSE: &str =
    "I'm not sure I understand. Try asking for help to see what I can do.";

const HELP_RESPONSE: &str = r#"Here are some things you can ask me to do:
- Control lights: "Turn on the living room lights" or "Dim the bedroom lights to 50%"
- Check light status: "Are the kitchen lights on?"
- Set alarms: "Set an alarm for 7:30 am" or "Wake me up at 6:00"
- Ask about time: "What time is it?"
- Ask about date: "What day is today?"
You can also say hello or goodbye!"#;

const ROOM_FAILURE: &str = "I couldn't figure out which room you're referring to.";
const LIGHT_FAILURE: &str = "I couldn't understand that light command.";
const STATUS_FAILURE: &str = "I couldn't figure out which lights you're asking about.";
const ALARM_FAILURE: &str = "I couldn't understand that alarm command.";

/// Builds commands from (intent, raw utterance) pairs.
pub struct CommandBuilder {
    chooser: Box<dyn Chooser>,
    clock: Box<dyn Clock>,
    brightness_pattern: Regex,
    alarm_time_pattern: Regex,
}

impl CommandBuilder {
    pub fn new(chooser: Box<dyn Chooser>, clock: Box<dyn Clock>) -> Self {
        Self {
            chooser,
            clock,
            brightness_pattern: Regex::new(r"(\d+)%?").expect("static regex"),
            alarm_time_pattern: Regex::new(r"(\d+(?::\d+)?)\s*(am|pm)?").expect("static regex"),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Box::new(RandomChooser), Box::new(SystemClock))
    }

    /// Build the single command for an utterance classified as `intent`.
    pub fn build(&mut self, intent: Intent, raw: &str) -> Command {
        match intent {
            Intent::Greeting => Command::Respond(self.choose(GREETING_RESPONSES)),
            Intent::Farewell => Command::Respond(self.choose(FAREWELL_RESPONSES)),
            Intent::Gratitude => Command::Respond(self.choose(GRATITUDE_RESPONSES)),
            Intent::LightControl => self.build_light_control(raw),
            Intent::LightStatus => self.build_light_status(raw),
            Intent::AlarmControl => self.build_alarm_control(raw),
            Intent::TimeQuery => {
                let now = self.clock.now();
                Command::Respond(format!(
                    "The current time is {}",
                    now.format("%I:%M %p")
                ))
            }
            Intent::DateQuery => {
                let now = self.clock.now();
                Command::Respond(format!("Today is {}", now.format("%A, %B %d, %Y")))
            }
            Intent::WeatherQuery => Command::Respond(WEATHER_RESPONSE.to_string()),
            Intent::Help => Command::Respond(HELP_RESPONSE.to_string()),
            Intent::Unknown => Command::Respond(UNKNOWN_RESPONSE.to_string()),
        }
    }

    fn choose(&mut self, options: &[&str]) -> String {
        options[self.chooser.pick(options.len())].to_string()
    }

    /// Sub-command priority is fixed: "dim" first, then "color"/"change",
    /// then bare "on" before "off". A branch that wins but fails extraction
    /// falls through to the failure response, not to the next branch.
    fn build_light_control(&mut self, raw: &str) -> Command {
        let lower = raw.to_lowercase();

        let Some(room) = resolver::resolve_room(&lower) else {
            return Command::Respond(ROOM_FAILURE.to_string());
        };

        if lower.contains("dim") {
            if let Some(brightness) = self.extract_brightness(&lower) {
                return Command::LightControl {
                    room: room.to_string(),
                    op: LightOp::Dim,
                    brightness: Some(brightness),
                    color: None,
                };
            }
        } else if lower.contains("color") || lower.contains("change") {
            if let Some(color) = resolver::resolve_color(&lower) {
                return Command::LightControl {
                    room: room.to_string(),
                    op: LightOp::Color,
                    brightness: None,
                    color: Some(color.to_string()),
                };
            }
        } else if lower.contains("on") {
            return Command::LightControl {
                room: room.to_string(),
                op: LightOp::On,
                brightness: None,
                color: None,
            };
        } else if lower.contains("off") {
            return Command::LightControl {
                room: room.to_string(),
                op: LightOp::Off,
                brightness: None,
                color: None,
            };
        }

        Command::Respond(LIGHT_FAILURE.to_string())
    }

    fn build_light_status(&mut self, raw: &str) -> Command {
        let lower = raw.to_lowercase();

        if lower.contains("light status") {
            return Command::LightStatus(None);
        }

        match resolver::resolve_room(&lower) {
            Some(room) => Command::LightStatus(Some(room.to_string())),
            None => Command::Respond(STATUS_FAILURE.to_string()),
        }
    }

    /// "list"/"what" and "clear" take priority over time extraction, so an
    /// utterance naming both a listing keyword and a time is a listing.
    fn build_alarm_control(&mut self, raw: &str) -> Command {
        let lower = raw.to_lowercase();

        if lower.contains("list") || lower.contains("what") {
            return Command::ListAlarms;
        }
        if lower.contains("clear") {
            return Command::ClearAlarms;
        }

        if let Some(found) = self.alarm_time_pattern.captures(&lower) {
            let token = &found[1];
            let meridiem = time::parse_meridiem(found.get(2).map(|m| m.as_str()));
            if let Ok(normalized) = time::normalize(token, meridiem) {
                return Command::SetAlarm(normalized);
            }
        }

        Command::Respond(ALARM_FAILURE.to_string())
    }

    fn extract_brightness(&self, text: &str) -> Option<u8> {
        self.brightness_pattern
            .captures(text)
            .and_then(|found| found[1].parse().ok())
    }
}
