//! Normalization of loose time expressions into canonical 24-hour `HH:MM`.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    #[error("'{0}' is not a recognizable time")]
    InvalidFormat(String),
}

/// Convert a loose time token (`7`, `07`, `7:30`, `19:30`) plus an optional
/// meridiem into zero-padded 24-hour `HH:MM`.
///
/// `pm` adds 12 to hours below 12; `am` maps hour 12 to 0. Without a
/// meridiem the hour passes through unchanged (24-hour assumption). Hours
/// above 23 or minutes above 59 are rejected rather than wrapped.
pub fn normalize(token: &str, meridiem: Option<Meridiem>) -> Result<String, TimeError> {
    let invalid = || TimeError::InvalidFormat(token.to_string());

    let (hour_part, minute_part) = match token.split_once(':') {
        Some((hour, minute)) => (hour, Some(minute)),
        None => (token, None),
    };

    if hour_part.is_empty() || hour_part.len() > 2 {
        return Err(invalid());
    }
    let mut hour: u32 = hour_part.parse().map_err(|_| invalid())?;

    let minute: u32 = match minute_part {
        Some(minute) if minute.len() == 2 => minute.parse().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
        None => 0,
    };

    if hour > 23 || minute > 59 {
        return Err(invalid());
    }

    match meridiem {
        Some(Meridiem::Pm) if hour < 12 => hour += 12,
        Some(Meridiem::Am) if hour == 12 => hour = 0,
        _ => {}
    }

    Ok(format!("{hour:02}:{minute:02}"))
}

/// Parse an optional meridiem suffix captured from an utterance.
pub fn parse_meridiem(suffix: Option<&str>) -> Option<Meridiem> {
    suffix.and_then(|s| Meridiem::from_str(s.trim()).ok())
}
