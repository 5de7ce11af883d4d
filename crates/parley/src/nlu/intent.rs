//! Intent classification via ordered pattern rules.
//!
//! Rules are an explicit ordered list, walked top to bottom with first-match
//! wins. The ordering is load-bearing: conversational intents shadow domain
//! intents ("goodbye" is a farewell even though it contains no domain
//! keyword), and domain intents shadow the generic time/date/weather/help
//! queries ("what alarms are set" must hit alarm_control before a "what"
//! pattern elsewhere can claim it). Do not replace this with map dispatch.

use regex::Regex;
use tracing::debug;

/// Intent label assigned to an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Gratitude,
    LightControl,
    LightStatus,
    AlarmControl,
    TimeQuery,
    DateQuery,
    WeatherQuery,
    Help,
    Unknown,
}

/// Result of classifying one utterance: the winning intent plus the capture
/// groups of the pattern that matched (empty for `Unknown`).
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Intent,
    pub captures: Vec<Option<String>>,
}

struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
}

/// Classifies utterances against the fixed rule table.
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

/// Declaration-ordered rule table. Patterns match anywhere in the utterance,
/// not the full string.
const RULES: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &[
            r"hello",
            r"hi there",
            r"hey",
            r"greetings",
            r"good morning",
            r"good afternoon",
            r"good evening",
            r"howdy",
        ],
    ),
    (
        Intent::Farewell,
        &[
            r"goodbye",
            r"bye",
            r"see you",
            r"see you later",
            r"good night",
            r"farewell",
            r"take care",
        ],
    ),
    (
        Intent::Gratitude,
        &[r"thank you", r"thanks", r"appreciate it", r"thanks a lot"],
    ),
    (
        Intent::LightControl,
        &[
            r"turn (on|off) (the )?([\w\s]+) lights?",
            r"([\w\s]+) lights? (on|off)",
            r"dim (the )?([\w\s]+) lights? to (\d+)%?",
            r"change (the )?([\w\s]+) lights? to ([\w\s]+) color",
        ],
    ),
    (
        Intent::LightStatus,
        &[
            r"(how are|what's the status of) (the )?([\w\s]+) lights?",
            r"are (the )?([\w\s]+) lights? (on|off)",
            r"light status",
        ],
    ),
    (
        Intent::AlarmControl,
        &[
            r"set (an )?alarm for ([\d:]+)(?: ?(am|pm))?",
            r"wake me up at ([\d:]+)(?: ?(am|pm))?",
            r"what alarms (do i have|are set)",
            r"list( all)? alarms",
            r"clear( all)? alarms",
        ],
    ),
    (
        Intent::TimeQuery,
        &[
            r"what time is it",
            r"current time",
            r"tell me the time",
            r"what's the time",
        ],
    ),
    (
        Intent::DateQuery,
        &[
            r"what (day|date) is (it|today)",
            r"today's date",
            r"current date",
            r"what's the date",
        ],
    ),
    (
        Intent::WeatherQuery,
        &[
            r"what's the weather( like)?( today| now)?",
            r"(is it|will it be) (sunny|rainy|cloudy|snowing)( today| tomorrow)?",
            r"do i need (a|an) (umbrella|jacket|coat)( today| tomorrow)?",
        ],
    ),
    (
        Intent::Help,
        &[
            r"help( me)?",
            r"what can you do",
            r"commands",
            r"features",
            r"what (commands|things) can i say",
        ],
    ),
];

impl IntentMatcher {
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .map(|(intent, patterns)| IntentRule {
                intent: *intent,
                patterns: patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("static intent pattern"))
                    .collect(),
            })
            .collect();

        Self { rules }
    }

    /// Classify an utterance. Falls back to [`Intent::Unknown`] with no
    /// captures when nothing in the rule table matches.
    pub fn classify(&self, utterance: &str) -> Classification {
        let text = utterance.trim().to_lowercase();

        for rule in &self.rules {
            for pattern in &rule.patterns {
                if let Some(found) = pattern.captures(&text) {
                    let captures = found
                        .iter()
                        .skip(1)
                        .map(|group| group.map(|m| m.as_str().to_string()))
                        .collect();
                    debug!(intent = %rule.intent, pattern = %pattern, "intent matched");
                    return Classification {
                        intent: rule.intent,
                        captures,
                    };
                }
            }
        }

        debug!("no intent matched");
        Classification {
            intent: Intent::Unknown,
            captures: Vec::new(),
        }
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}
