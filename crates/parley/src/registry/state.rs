use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// Power state of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    #[default]
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }
}

/// State of a single light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    /// Whether the light is on or off.
    pub state: PowerState,

    /// Brightness level (0-100).
    pub brightness: u8,

    /// Current color, from the color vocabulary or free text.
    pub color: String,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            state: PowerState::Off,
            brightness: 100,
            color: "white".to_string(),
        }
    }
}

/// Persisted snapshot of every device the registry knows about.
///
/// Serializes to the store's nested mapping:
/// `{"lights": {room: {state, brightness, color}}, "alarms": ["HH:MM", ...]}`.
/// Light iteration order is registration order, which `IndexMap` preserves
/// across a save/load round trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegistryState {
    pub lights: IndexMap<String, LightState>,

    /// Alarm times in canonical `HH:MM` form, insertion order, duplicates
    /// allowed.
    pub alarms: Vec<String>,
}

impl RegistryState {
    /// Default seed used when no persisted state exists: three rooms, all
    /// off at full brightness in white, no alarms.
    pub fn seed() -> Self {
        let mut lights = IndexMap::new();
        for room in ["living_room", "bedroom", "kitchen"] {
            lights.insert(room.to_string(), LightState::default());
        }
        Self {
            lights,
            alarms: Vec::new(),
        }
    }
}
