//! Server-side form validation.
//!
//! Forms arrive as loosely typed JSON (every field optional, strings for ids
//! and dates) and are turned into typed inputs. Every problem is collected per
//! field so clients can show all messages at once.

pub mod briefing;
pub mod collaboration;
pub mod company;
pub mod contact;
pub mod template;

pub use briefing::{BriefingForm, BriefingInput};
pub use collaboration::{CollaborationChanges, CollaborationForm, CollaborationInput, CollaborationPatch, StatusForm};
pub use company::{CompanyForm, CompanyInput};
pub use contact::{ContactForm, ContactInput};
pub use template::{BriefingTemplateForm, BriefingTemplateInput};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::FieldErrors;

/// Upper bound for free-text fields (notes, briefing sections)
pub const LONG_TEXT_MAX: usize = 5000;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9+\-/() ]+$").expect("phone pattern compiles"));

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: FieldErrors,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `Ok(value)` when nothing was recorded
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn into_field_errors(self) -> FieldErrors {
        self.errors
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Trimmed value, with blank strings treated as absent
pub fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Required text of `min..=max` characters. Returns an empty string when invalid.
pub fn required_text(errors: &mut ValidationErrors, field: &str, label: &str, value: Option<String>, max: usize) -> String {
    match normalize(value) {
        None => {
            errors.add(field, format!("{} is required", label));
            String::new()
        }
        Some(text) => {
            if text.chars().count() > max {
                errors.add(field, format!("{} must be at most {} characters", label, max));
            }
            text
        }
    }
}

pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<String>,
    max: usize,
) -> Option<String> {
    let text = normalize(value)?;
    if text.chars().count() > max {
        errors.add(field, format!("{} must be at most {} characters", label, max));
    }
    Some(text)
}

pub fn required_uuid(errors: &mut ValidationErrors, field: &str, label: &str, value: Option<String>) -> Option<Uuid> {
    match normalize(value) {
        None => {
            errors.add(field, format!("{} is required", label));
            None
        }
        Some(raw) => parse_uuid(errors, field, &raw),
    }
}

pub fn parse_uuid(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<Uuid> {
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Invalid ID");
            None
        }
    }
}

/// Optional date, either `YYYY-MM-DD` (midnight UTC) or RFC 3339
pub fn optional_date(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<DateTime<Utc>> {
    let raw = normalize(value)?;
    match parse_date(&raw) {
        Some(date) => Some(date),
        None => {
            errors.add(field, "Invalid date");
            None
        }
    }
}

pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight));
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|d| d.with_timezone(&Utc))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Absolute http(s) URL with a host
pub fn is_valid_website(website: &str) -> bool {
    match url::Url::parse(website) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
