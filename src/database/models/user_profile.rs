use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    AgencyAdmin,
    Influencer,
    Brand,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::AgencyAdmin, UserRole::Influencer, UserRole::Brand];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::AgencyAdmin => "agency_admin",
            UserRole::Influencer => "influencer",
            UserRole::Brand => "brand",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::AgencyAdmin => "Agency Admin",
            UserRole::Influencer => "Influencer",
            UserRole::Brand => "Company / Brand",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "role", value: s.to_string() })
    }
}

impl TryFrom<String> for UserRole {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact influencer reference used in option lists and nested collaboration payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InfluencerRef {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
}
