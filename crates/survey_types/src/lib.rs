//! Shared types for the student stress diagnosis form.
//!
//! This crate defines the fixed survey schema sent to the prediction
//! service, the reply body it returns, and the mapping from a reply to
//! the text shown in the result panel. It has no I/O of its own so the
//! browser and native clients resolve replies identically.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Number of survey questions.
pub const FIELD_COUNT: usize = 20;

/// Survey field keys, in form order. This is also the request schema.
pub const FIELD_KEYS: [&str; FIELD_COUNT] = [
    "anxiety_level",
    "self_esteem",
    "mental_health_history",
    "depression",
    "headache",
    "blood_pressure",
    "sleep_quality",
    "breathing_problem",
    "noise_level",
    "living_conditions",
    "safety",
    "basic_needs",
    "academic_performance",
    "study_load",
    "teacher_student_relationship",
    "future_career_concerns",
    "social_support",
    "peer_pressure",
    "extracurricular_activities",
    "bullying",
];

/// Stress level codes and their display labels.
pub const STRESS_LABELS: [(&str, &str); 3] = [
    ("0", "Low Stress"),
    ("1", "Moderate Stress"),
    ("2", "High Stress"),
];

/// Shown when the server reports failure without an `error` message.
pub const ERROR_OCCURRED: &str = "Error occurred";

/// Shown for any transport or decoding failure.
pub const BACKEND_UNREACHABLE: &str = "Backend server not reachable";

/// Errors from building or checking a [`FormState`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown survey field: {0}")]
    UnknownField(String),

    #[error("Field `{0}` is required")]
    EmptyField(&'static str),

    #[error("Field `{field}` must be a number, got {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("Invalid answers: {0}")]
    InvalidAnswers(String),
}

/// Look up the label for a stress level code.
pub fn stress_label(code: &str) -> Option<&'static str> {
    STRESS_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Human-readable label for a field key: underscores become spaces and
/// each word is capitalized (`sleep_quality` -> `Sleep Quality`).
pub fn field_label(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn field_index(key: &str) -> Option<usize> {
    FIELD_KEYS.iter().position(|k| *k == key)
}

/// Current answers, one raw string per survey field.
///
/// The key set is fixed: every field in [`FIELD_KEYS`] is always present,
/// starting out empty. Values are not parsed until a client checks the
/// native input constraint before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: [String; FIELD_COUNT],
}

impl FormState {
    /// Create a form with every field empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw value of a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        field_index(key).map(|i| self.values[i].as_str())
    }

    /// Return a new snapshot with one field replaced.
    pub fn with_value(&self, key: &str, value: impl Into<String>) -> Result<Self, FormError> {
        let mut next = self.clone();
        next.set(key, value)?;
        Ok(next)
    }

    /// Replace one field in place.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), FormError> {
        let i = field_index(key).ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        self.values[i] = value.into();
        Ok(())
    }

    /// Iterate over `(key, value)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FIELD_KEYS
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Keys whose value is still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| k)
            .collect()
    }

    /// Apply the constraint a `required` numeric input enforces: every
    /// field non-empty and parseable as a finite number.
    pub fn check_native_constraints(&self) -> Result<(), FormError> {
        for (key, value) in self.iter() {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(FormError::EmptyField(key));
            }
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => {}
                _ => {
                    return Err(FormError::NotNumeric {
                        field: key,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Build a form from a flat JSON object of answers.
    ///
    /// Values may be strings or numbers; numbers are stored in their
    /// JSON text form. Fields not mentioned stay empty.
    pub fn from_answers(answers: &Value) -> Result<Self, FormError> {
        let Value::Object(map) = answers else {
            return Err(FormError::InvalidAnswers(
                "expected a JSON object of field answers".to_string(),
            ));
        };

        let mut form = Self::new();
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => number_text(n),
                other => {
                    return Err(FormError::InvalidAnswers(format!(
                        "field `{key}` must be a string or number, got {other}"
                    )));
                }
            };
            form.set(key, text)?;
        }
        Ok(form)
    }
}

impl Serialize for FormState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Errors from decoding a reply body.
#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("Reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reply is not a JSON object")]
    NotAnObject,
}

/// Reply body from the prediction service.
///
/// Both fields are kept as raw JSON because the service is not strict
/// about types: `stress_level` may arrive as `"1"` or `1`. A `null`
/// field counts as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictResponse {
    pub stress_level: Option<Value>,
    pub error: Option<Value>,
}

impl PredictResponse {
    /// Decode a reply body.
    ///
    /// A zero-length body on a failure status decodes as `{}`; anywhere
    /// else, a body that is not a JSON object is a decode error.
    pub fn parse(success: bool, body: &[u8]) -> Result<Self, ReplyError> {
        if !success && body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let Value::Object(mut map) = serde_json::from_slice::<Value>(body)? else {
            return Err(ReplyError::NotAnObject);
        };
        Ok(Self {
            stress_level: map.remove("stress_level").filter(|v| !v.is_null()),
            error: map.remove("error").filter(|v| !v.is_null()),
        })
    }
}

/// What a submit attempt settled to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Outcome {
    /// Known stress level.
    Label(&'static str),
    /// Stress level outside the label table, shown as sent.
    Raw(String),
    /// Failure status, with the server's message or the generic fallback.
    ServerError(String),
    /// The request or reply decoding failed.
    Unreachable,
    /// Success reply without a usable `stress_level`. Nothing is shown.
    Missing,
}

impl Outcome {
    /// Resolve a decoded reply.
    pub fn from_response(success: bool, response: &PredictResponse) -> Self {
        if success {
            let Some(level) = response.stress_level.as_ref() else {
                return Outcome::Missing;
            };
            if let Some(label) = lookup_key(level).as_deref().and_then(stress_label) {
                return Outcome::Label(label);
            }
            match shown_text(level) {
                Some(text) => Outcome::Raw(text),
                None => Outcome::Missing,
            }
        } else {
            let message = response
                .error
                .as_ref()
                .and_then(shown_text)
                .unwrap_or_else(|| ERROR_OCCURRED.to_string());
            Outcome::ServerError(message)
        }
    }

    /// Decode and resolve a raw reply. Decode failures collapse to
    /// [`Outcome::Unreachable`].
    pub fn from_reply(success: bool, body: &[u8]) -> Self {
        match PredictResponse::parse(success, body) {
            Ok(response) => Self::from_response(success, &response),
            Err(_) => Outcome::Unreachable,
        }
    }

    /// Text for the result panel, if any.
    pub fn display(&self) -> Option<&str> {
        match self {
            Outcome::Label(label) => Some(label),
            Outcome::Raw(text) | Outcome::ServerError(text) => Some(text),
            Outcome::Unreachable => Some(BACKEND_UNREACHABLE),
            Outcome::Missing => None,
        }
    }
}

/// Key used against the label table: strings as sent, numbers in text form.
fn lookup_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Text a reply value shows as. Non-empty strings and non-zero numbers
/// show; `0`, `""`, booleans, arrays and objects show nothing.
fn shown_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(n)),
        _ => None,
    }
}

// Integral floats print without a fraction so `1.0` looks up as "1".
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
