//! The device registry: validated mutations over lights and alarms, with
//! write-through persistence to a [`StateStore`].

use regex::Regex;
use tracing::info;

use super::state::LightState;
use super::state::PowerState;
use super::state::RegistryState;
use super::store::StateStore;
use super::store::StoreError;

/// Operation applied to a light by [`DeviceRegistry::set_light`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LightOp {
    On,
    Off,
    Dim,
    Color,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no lights registered in room '{0}'")]
    UnknownRoom(String),

    #[error("alarm time '{0}' is not in HH:MM format")]
    InvalidTimeFormat(String),

    #[error("unsupported light operation: {op} (brightness: {brightness:?}, color: {color:?})")]
    UnsupportedOperation {
        op: LightOp,
        brightness: Option<u8>,
        color: Option<String>,
    },

    #[error("brightness {0} is out of range (0-100)")]
    BrightnessOutOfRange(u8),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-memory model of every light and alarm, backed by a store.
///
/// Every successful mutation persists the full state before returning, so a
/// crash loses at most the change in flight. The registry assumes a single
/// caller; wrap it in a mutex before sharing it across threads.
pub struct DeviceRegistry {
    state: RegistryState,
    store: Box<dyn StateStore>,
    alarm_format: Regex,
}

/// Stored room keys use underscores; user-facing text uses spaces.
fn display_room(key: &str) -> String {
    key.replace('_', " ")
}

/// Normalized form used for room lookup: case-insensitive, with spaces and
/// underscores treated as the same separator.
fn room_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

impl DeviceRegistry {
    /// Open the registry over a store, seeding defaults when the store is
    /// empty. The seed is persisted immediately so a fresh install leaves a
    /// valid store behind.
    pub fn open(store: Box<dyn StateStore>) -> Result<Self, RegistryError> {
        let state = match store.load()? {
            Some(state) => state,
            None => {
                let seed = RegistryState::seed();
                store.save(&seed)?;
                seed
            }
        };

        info!(
            lights = state.lights.len(),
            alarms = state.alarms.len(),
            "device registry loaded"
        );

        Ok(Self {
            state,
            store,
            // Normalizer output must already satisfy this; re-checking here
            // keeps the stored alarm list well-formed no matter the caller.
            alarm_format: Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$")
                .expect("static regex"),
        })
    }

    /// Apply a light operation to a room. Returns the spoken confirmation.
    pub fn set_light(
        &mut self,
        room: &str,
        op: LightOp,
        brightness: Option<u8>,
        color: Option<&str>,
    ) -> Result<String, RegistryError> {
        let key = self
            .lookup_room(room)
            .ok_or_else(|| RegistryError::UnknownRoom(display_room(&room_key(room))))?;

        let spoken = display_room(&key);
        let light = self
            .state
            .lights
            .get_mut(&key)
            .ok_or_else(|| RegistryError::UnknownRoom(spoken.clone()))?;

        let result = match (op, brightness, color) {
            (LightOp::On, _, _) => {
                light.state = PowerState::On;
                format!("{spoken} lights turned on")
            }
            (LightOp::Off, _, _) => {
                light.state = PowerState::Off;
                format!("{spoken} lights turned off")
            }
            (LightOp::Dim, Some(level), _) => {
                if level > 100 {
                    return Err(RegistryError::BrightnessOutOfRange(level));
                }
                light.brightness = level;
                light.state = PowerState::On;
                format!("{spoken} lights dimmed to {level}%")
            }
            (LightOp::Color, _, Some(color)) => {
                light.color = color.to_string();
                light.state = PowerState::On;
                format!("{spoken} lights changed to {color}")
            }
            (op, brightness, color) => {
                return Err(RegistryError::UnsupportedOperation {
                    op,
                    brightness,
                    color: color.map(str::to_string),
                })
            }
        };

        self.store.save(&self.state)?;
        info!(room = %key, %op, "light control: {result}");
        Ok(result)
    }

    /// Status text for one room, or a one-line summary of every room when no
    /// room is given. Summary order is registration order.
    pub fn light_status(&self, room: Option<&str>) -> Result<String, RegistryError> {
        match room {
            Some(room) => {
                let key = self
                    .lookup_room(room)
                    .ok_or_else(|| RegistryError::UnknownRoom(display_room(&room_key(room))))?;
                let light = &self.state.lights[&key];
                Ok(format!(
                    "The {} lights are {}, brightness is {}%, and color is {}",
                    display_room(&key),
                    light.state.as_str(),
                    light.brightness,
                    light.color
                ))
            }
            None => {
                let summary: Vec<String> = self
                    .state
                    .lights
                    .iter()
                    .map(|(key, light)| format!("{}: {}", display_room(key), light.state.as_str()))
                    .collect();
                Ok(format!("Light status: {}", summary.join(", ")))
            }
        }
    }

    /// Append an alarm. Duplicates are allowed; "set alarm" is at-least-once.
    pub fn set_alarm(&mut self, time: &str) -> Result<String, RegistryError> {
        if !self.alarm_format.is_match(time) {
            return Err(RegistryError::InvalidTimeFormat(time.to_string()));
        }

        self.state.alarms.push(time.to_string());
        self.store.save(&self.state)?;
        info!(%time, "alarm set");
        Ok(format!("Alarm set for {time}"))
    }

    /// List alarms in insertion order.
    pub fn list_alarms(&self) -> String {
        if self.state.alarms.is_empty() {
            return "You have no alarms set".to_string();
        }
        format!("Your alarms: {}", self.state.alarms.join(", "))
    }

    /// Remove every alarm, returning how many there were.
    pub fn clear_alarms(&mut self) -> Result<usize, RegistryError> {
        let count = self.state.alarms.len();
        self.state.alarms.clear();
        self.store.save(&self.state)?;
        info!(count, "all alarms cleared");
        Ok(count)
    }

    /// Snapshot of the current state, mainly for tests and diagnostics.
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    fn lookup_room(&self, room: &str) -> Option<String> {
        let wanted = room_key(room);
        self.state
            .lights
            .keys()
            .find(|key| room_key(key) == wanted)
            .cloned()
    }
}
