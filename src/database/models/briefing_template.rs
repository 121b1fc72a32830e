use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BriefingTemplate {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub template_data: Json<BriefingTemplateData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Preset briefing fields. Absent fields are left out of the stored JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BriefingTemplateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverables: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dos_donts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_guidelines: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
