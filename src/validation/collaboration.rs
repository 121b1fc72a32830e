use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::{
    deserialize_some, normalize, optional_date, optional_text, parse_uuid, required_text, required_uuid,
    ValidationErrors, LONG_TEXT_MAX,
};
use crate::database::models::CollaborationStatus;

const TITLE_MAX: usize = 200;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollaborationForm {
    pub title: Option<String>,
    pub company_id: Option<String>,
    pub assigned_influencer_id: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollaborationInput {
    pub title: String,
    pub company_id: Uuid,
    pub assigned_influencer_id: Option<Uuid>,
    pub status: CollaborationStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl CollaborationForm {
    pub fn validate(self) -> Result<CollaborationInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = required_text(&mut errors, "title", "Title", self.title, TITLE_MAX);
        let company_id = required_uuid(&mut errors, "company_id", "Company", self.company_id);
        let assigned_influencer_id = influencer_id(&mut errors, self.assigned_influencer_id);
        let status = match normalize(self.status) {
            Some(raw) => parse_status(&mut errors, &raw),
            None => Some(CollaborationStatus::default()),
        };
        let deadline = optional_date(&mut errors, "deadline", self.deadline);
        let notes = optional_text(&mut errors, "notes", "Notes", self.notes, LONG_TEXT_MAX);

        match (company_id, status) {
            (Some(company_id), Some(status)) if errors.is_empty() => Ok(CollaborationInput {
                title,
                company_id,
                assigned_influencer_id,
                status,
                deadline,
                notes,
            }),
            _ => Err(errors),
        }
    }
}

/// Partial update. Absent fields stay untouched; `null` or `""` clears optional ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollaborationPatch {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub company_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub assigned_influencer_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub deadline: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollaborationChanges {
    pub title: Option<String>,
    pub company_id: Option<Uuid>,
    pub assigned_influencer_id: Option<Option<Uuid>>,
    pub status: Option<CollaborationStatus>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub notes: Option<Option<String>>,
}

impl CollaborationChanges {
    pub fn is_empty(&self) -> bool {
        self == &CollaborationChanges::default()
    }
}

impl CollaborationPatch {
    pub fn validate(self) -> Result<CollaborationChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut changes = CollaborationChanges::default();

        if let Some(title) = self.title {
            changes.title = Some(required_text(&mut errors, "title", "Title", title, TITLE_MAX));
        }
        if let Some(company_id) = self.company_id {
            changes.company_id = required_uuid(&mut errors, "company_id", "Company", company_id);
        }
        if let Some(influencer) = self.assigned_influencer_id {
            changes.assigned_influencer_id = Some(influencer_id(&mut errors, influencer));
        }
        if let Some(status) = self.status {
            changes.status = match normalize(status) {
                Some(raw) => parse_status(&mut errors, &raw),
                None => {
                    errors.add("status", "Status is required");
                    None
                }
            };
        }
        if let Some(deadline) = self.deadline {
            changes.deadline = Some(optional_date(&mut errors, "deadline", deadline));
        }
        if let Some(notes) = self.notes {
            changes.notes = Some(optional_text(&mut errors, "notes", "Notes", notes, LONG_TEXT_MAX));
        }

        errors.finish(changes)
    }
}

/// Body of `PATCH /collaborations/:id/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusForm {
    pub status: Option<String>,
}

impl StatusForm {
    pub fn validate(self) -> Result<CollaborationStatus, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let status = match normalize(self.status) {
            Some(raw) => parse_status(&mut errors, &raw),
            None => {
                errors.add("status", "Status is required");
                None
            }
        };
        match status {
            Some(status) => Ok(status),
            None => Err(errors),
        }
    }
}

fn parse_status(errors: &mut ValidationErrors, raw: &str) -> Option<CollaborationStatus> {
    match raw.parse::<CollaborationStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            errors.add("status", "Invalid status");
            None
        }
    }
}

/// Select inputs send `""` or `"none"` for "no influencer"
fn influencer_id(errors: &mut ValidationErrors, value: Option<String>) -> Option<Uuid> {
    let raw = normalize(value)?;
    if raw.eq_ignore_ascii_case("none") {
        return None;
    }
    parse_uuid(errors, "assigned_influencer_id", &raw)
}
