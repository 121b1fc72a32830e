use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Briefing {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub collaboration_id: Uuid,
    pub campaign_goal: String,
    pub target_audience: Option<String>,
    pub deliverables: Option<String>,
    pub hashtags: Option<String>,
    pub dos_donts: Option<String>,
    pub content_guidelines: Option<String>,
    pub posting_period_start: Option<DateTime<Utc>>,
    pub posting_period_end: Option<DateTime<Utc>>,
    pub compensation: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
