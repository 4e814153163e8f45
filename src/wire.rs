//! JSON wire helpers.
//!
//! Form fields arrive from the browser as strings, and the older call sites
//! disagree on field names. The canonical naming is snake_case; legacy names
//! are accepted through serde aliases on the request/response types. The
//! lenient number readers below turn anything that is not a finite number
//! into "missing", so the estimator's tolerant defaults apply.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{SimError, TransportError};

fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Reads an optional number, accepting numeric strings. Anything else is `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(number_from_value))
}

/// Reads an optional whole, non-negative count that fits in `u32`.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let whole = n as u32;
            whole
        }))
}

/// Serialize any wire type to pretty JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, SimError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        TransportError::SerializationFailed {
            message: e.to_string(),
        }
        .into()
    })
}

/// Deserialize any wire type from JSON.
///
/// Strict callers should then invoke `validate()` on requests.
pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T, SimError> {
    serde_json::from_str::<T>(s).map_err(|e| {
        TransportError::DeserializationFailed {
            message: e.to_string(),
        }
        .into()
    })
}
