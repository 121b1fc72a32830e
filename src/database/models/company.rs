use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Contact;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the `company_overview` view: a company plus its contact count
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyOverview {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub company: Company,
    pub contact_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyWithContacts {
    #[serde(flatten)]
    pub company: Company,
    pub contacts: Vec<Contact>,
}

/// `{id, name}` pair used in option lists and nested collaboration payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CompanyRef {
    pub id: Uuid,
    pub name: String,
}
