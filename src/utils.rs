/// Utility functions
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::{ApiError, ApiResult};

/// Extract number from JSON value
pub fn num(v: &Value) -> Option<f64> {
    if let Some(x) = v.as_f64() {
        return Some(x);
    }
    if let Some(s) = v.as_str() {
        return s.trim().parse::<f64>().ok();
    }
    None
}

/// Deserialize an optional field that upstream APIs send either as a JSON
/// number or as a numeric string. `null` and absent fields become `None`.
pub fn de_opt_num<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(v) => num(&v)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a number or numeric string, got {v}"))),
    }
}

/// Pull a required sub-object out of a request body and deserialize it.
pub fn required_field<T: DeserializeOwned>(body: &Value, key: &str, what: &str) -> ApiResult<T> {
    let raw = match body.get(key) {
        None | Some(Value::Null) => {
            return Err(ApiError::InvalidInput(format!("{what} data is required")))
        }
        Some(v) => v.clone(),
    };

    serde_json::from_value(raw)
        .map_err(|e| ApiError::InvalidInput(format!("malformed {what} data: {e}")))
}

/// Like [`required_field`], but an absent or null field yields the default.
pub fn optional_field<T: DeserializeOwned + Default>(body: &Value, key: &str, what: &str) -> ApiResult<T> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(_) => required_field(body, key, what),
    }
}

/// Round to a whole number and group digits by thousands: 750000.4 -> "750,000"
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
