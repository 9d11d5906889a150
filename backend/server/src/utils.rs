use chrono::{DateTime, Utc};
use records::{MAX_LEVEL, MIN_LEVEL};
use serde_json::Value;

use crate::error::AppError;

pub const FIELDS_REQUIRED: &str = "All fields are required";
pub const LEVELS_REQUIRED: &str = "Pain level and energy level are required";
pub const LEVELS_OUT_OF_RANGE: &str = "Levels must be between 1 and 10";

enum Level {
    Missing,
    Invalid,
    Value(i64),
}

fn read_level(value: Option<&Value>) -> Level {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Level::Missing,
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => Level::Missing,
        Some(Value::Number(number)) => number.as_i64().map_or(Level::Invalid, Level::Value),
        Some(Value::String(text)) if text.is_empty() => Level::Missing,
        Some(Value::String(text)) => text.trim().parse().map_or(Level::Invalid, Level::Value),
        Some(_) => Level::Invalid,
    }
}

fn in_range(level: &Level) -> Option<u8> {
    match level {
        Level::Value(n) if (i64::from(MIN_LEVEL)..=i64::from(MAX_LEVEL)).contains(n) => {
            u8::try_from(*n).ok()
        }
        _ => None,
    }
}

/// Missing levels are reported before range problems. Absent, `null`, `false`, `0` and `""`
/// all count as missing.
pub fn validate_levels(pain: Option<&Value>, energy: Option<&Value>) -> Result<(u8, u8), AppError> {
    let (pain, energy) = (read_level(pain), read_level(energy));

    if matches!(pain, Level::Missing) || matches!(energy, Level::Missing) {
        return Err(AppError::validation(LEVELS_REQUIRED));
    }

    match (in_range(&pain), in_range(&energy)) {
        (Some(pain), Some(energy)) => Ok((pain, energy)),
        _ => Err(AppError::validation(LEVELS_OUT_OF_RANGE)),
    }
}

/// Every field as sent, or a validation error if any is absent or blank.
pub fn require_all<const N: usize>(fields: [Option<String>; N]) -> Result<[String; N], AppError> {
    let mut values: [String; N] = std::array::from_fn(|_| String::new());

    for (slot, field) in values.iter_mut().zip(fields) {
        match field {
            Some(value) if !value.trim().is_empty() => *slot = value,
            _ => return Err(AppError::validation(FIELDS_REQUIRED)),
        }
    }

    Ok(values)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Stable, so records sharing a timestamp keep their stored order.
pub fn newest_first<T>(records: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    records.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}
