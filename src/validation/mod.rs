// Declarative payload validation.
//
// A schema is an ordered list of fields, each carrying a rule. Validation walks
// the schema in declaration order, collects every violation, and on success
// hands back a normalized copy of the payload holding only the declared fields.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub mod schemas;

/// Constraint attached to a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// String of at least `min` characters once surrounding whitespace is trimmed
    Text { min: usize },
    /// String of at least `min` characters, taken verbatim
    Secret { min: usize },
    /// `local@domain`, lower-cased
    Email,
    /// Whole number within `[min, max]`; `max` defaults to the 32-bit column limit
    Integer { min: i64, max: Option<i64> },
    /// `YYYY-MM-DD` or RFC 3339 timestamp, normalized to an RFC 3339 UTC timestamp
    Date,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
    pub required: bool,
    /// Accepts an explicit `null`
    pub nullable: bool,
}

impl Field {
    pub const fn required(name: &'static str, rule: Rule) -> Self {
        Self { name, rule, required: true, nullable: false }
    }

    /// May be absent, but not `null`
    pub const fn optional(name: &'static str, rule: Rule) -> Self {
        Self { name, rule, required: false, nullable: false }
    }

    /// May be absent or `null`; `null` clears the column on update
    pub const fn nullable(name: &'static str, rule: Rule) -> Self {
        Self { name, rule, required: false, nullable: true }
    }
}

/// Where the payload came from. Query strings carry every value as text,
/// so integers are parsed out of strings there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Body,
    Query,
}

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A payload type with a declared shape
pub trait Schema: DeserializeOwned {
    const FIELDS: &'static [Field];
}

/// Validate `payload` against `fields`.
///
/// Absent optional fields stay absent. An explicit `null` is kept as `null` on
/// nullable fields, so partial updates can tell "clear" from "leave alone", and
/// rejected everywhere else.
pub fn validate(
    fields: &[Field],
    payload: &Value,
    source: Source,
) -> Result<Map<String, Value>, Vec<FieldError>> {
    let Some(object) = payload.as_object() else {
        return Err(vec![FieldError::new("", "Expected a JSON object")]);
    };

    let mut normalized = Map::new();
    let mut errors = Vec::new();

    for field in fields {
        match object.get(field.name) {
            None | Some(Value::Null) if field.required => {
                errors.push(FieldError::new(field.name, format!("{} is required", field.name)));
            }
            None => {}
            Some(Value::Null) if field.nullable => {
                normalized.insert(field.name.to_string(), Value::Null);
            }
            Some(Value::Null) => {
                errors.push(FieldError::new(field.name, format!("{} must not be null", field.name)));
            }
            Some(value) => match check(field, value, source) {
                Ok(value) => {
                    normalized.insert(field.name.to_string(), value);
                }
                Err(message) => errors.push(FieldError::new(field.name, message)),
            },
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

/// Validate and deserialize into the schema's typed payload
pub fn parse<T: Schema>(payload: &Value, source: Source) -> Result<T, Vec<FieldError>> {
    let normalized = validate(T::FIELDS, payload, source)?;
    serde_json::from_value(Value::Object(normalized))
        .map_err(|e| vec![FieldError::new("", e.to_string())])
}

/// Deserializer for `Option<Option<T>>` fields: absent → `None`, `null` → `Some(None)`.
/// Pair with `#[serde(default)]`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check(field: &Field, value: &Value, source: Source) -> Result<Value, String> {
    let name = field.name;
    match field.rule {
        Rule::Text { min } => {
            let s = value.as_str().ok_or_else(|| format!("{name} must be a string"))?;
            let trimmed = s.trim();
            check_length(name, trimmed, min)?;
            Ok(Value::String(trimmed.to_string()))
        }
        Rule::Secret { min } => {
            let s = value.as_str().ok_or_else(|| format!("{name} must be a string"))?;
            check_length(name, s, min)?;
            Ok(Value::String(s.to_string()))
        }
        Rule::Email => {
            let s = value.as_str().ok_or_else(|| format!("{name} must be a string"))?;
            let email = s.trim().to_lowercase();
            if !is_email(&email) {
                return Err(format!("{name} must be a valid email address"));
            }
            Ok(Value::String(email))
        }
        Rule::Integer { min, max } => {
            let n = match (value, source) {
                (Value::Number(n), _) => n.as_i64(),
                (Value::String(s), Source::Query) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or_else(|| format!("{name} must be an integer"))?;

            let max = max.unwrap_or(i64::from(i32::MAX));
            if n < min {
                return Err(format!("{name} must be at least {min}"));
            }
            if n > max {
                return Err(format!("{name} must be at most {max}"));
            }
            Ok(Value::from(n))
        }
        Rule::Date => {
            let s = value.as_str().ok_or_else(|| format!("{name} must be a string"))?;
            let timestamp = parse_date(s.trim())
                .ok_or_else(|| format!("{name} must be an ISO-8601 date"))?;
            Ok(Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)))
        }
    }
}

fn check_length(name: &str, s: &str, min: usize) -> Result<(), String> {
    let len = s.chars().count();
    if min == 1 && len == 0 {
        return Err(format!("{name} must not be empty"));
    }
    if len < min {
        return Err(format!("{name} must be at least {min} characters"));
    }
    Ok(())
}

fn is_email(s: &str) -> bool {
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !s.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
