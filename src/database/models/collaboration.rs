use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{CompanyRef, InfluencerRef, UnknownVariant};

/// Lifecycle of a collaboration. Stored as text, guarded by a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    #[default]
    Requested,
    Negotiating,
    InProgress,
    Completed,
    Declined,
}

impl CollaborationStatus {
    pub const ALL: [CollaborationStatus; 5] = [
        CollaborationStatus::Requested,
        CollaborationStatus::Negotiating,
        CollaborationStatus::InProgress,
        CollaborationStatus::Completed,
        CollaborationStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollaborationStatus::Requested => "requested",
            CollaborationStatus::Negotiating => "negotiating",
            CollaborationStatus::InProgress => "in_progress",
            CollaborationStatus::Completed => "completed",
            CollaborationStatus::Declined => "declined",
        }
    }

    /// Completed and declined collaborations can no longer be overdue
    pub fn is_closed(&self) -> bool {
        matches!(self, CollaborationStatus::Completed | CollaborationStatus::Declined)
    }

    pub fn closed() -> [CollaborationStatus; 2] {
        [CollaborationStatus::Completed, CollaborationStatus::Declined]
    }
}

impl fmt::Display for CollaborationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollaborationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollaborationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "status", value: s.to_string() })
    }
}

impl TryFrom<String> for CollaborationStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Deadline passed and the collaboration is still open
pub fn is_overdue(deadline: Option<DateTime<Utc>>, status: CollaborationStatus, now: DateTime<Utc>) -> bool {
    match deadline {
        Some(deadline) => deadline < now && !status.is_closed(),
        None => false,
    }
}

/// Still open and due within `[now, now + window]`
pub fn is_upcoming(
    deadline: Option<DateTime<Utc>>,
    status: CollaborationStatus,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    match deadline {
        Some(deadline) => !status.is_closed() && deadline >= now && deadline <= now + window,
        None => false,
    }
}

/// Row of the `collaboration_details` view
#[derive(Debug, Clone, FromRow)]
pub struct CollaborationDetailsRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub company_id: Uuid,
    pub assigned_influencer_id: Option<Uuid>,
    #[sqlx(try_from = "String")]
    pub status: CollaborationStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company_name: String,
    pub influencer_user_id: Option<Uuid>,
    pub influencer_full_name: Option<String>,
}

/// Collaboration as returned by the API: nested company and influencer plus the derived overdue flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationWithRelations {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub company_id: Uuid,
    pub assigned_influencer_id: Option<Uuid>,
    pub status: CollaborationStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company: CompanyRef,
    pub assigned_influencer: Option<InfluencerRef>,
    pub is_overdue: bool,
}

impl CollaborationWithRelations {
    pub fn from_row(row: CollaborationDetailsRow, now: DateTime<Utc>) -> Self {
        let assigned_influencer = match (row.assigned_influencer_id, row.influencer_user_id, row.influencer_full_name) {
            (Some(id), Some(user_id), Some(full_name)) => Some(InfluencerRef { id, user_id, full_name }),
            _ => None,
        };

        Self {
            is_overdue: is_overdue(row.deadline, row.status, now),
            id: row.id,
            organization_id: row.organization_id,
            title: row.title,
            company: CompanyRef { id: row.company_id, name: row.company_name },
            company_id: row.company_id,
            assigned_influencer_id: row.assigned_influencer_id,
            status: row.status,
            deadline: row.deadline,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            assigned_influencer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: CollaborationStatus, deadline: Option<DateTime<Utc>>) -> CollaborationDetailsRow {
        let now = Utc::now();
        CollaborationDetailsRow {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            title: "Spring launch".into(),
            company_id: Uuid::new_v4(),
            assigned_influencer_id: None,
            status,
            deadline,
            notes: None,
            created_at: now,
            updated_at: now,
            company_name: "Acme".into(),
            influencer_user_id: None,
            influencer_full_name: None,
        }
    }

    #[test]
    fn overdue_requires_past_deadline_and_open_status() {
        let now = Utc::now();
        let yesterday = Some(now - Duration::days(1));
        let tomorrow = Some(now + Duration::days(1));

        assert!(is_overdue(yesterday, CollaborationStatus::Requested, now));
        assert!(is_overdue(yesterday, CollaborationStatus::InProgress, now));
        assert!(!is_overdue(yesterday, CollaborationStatus::Completed, now));
        assert!(!is_overdue(yesterday, CollaborationStatus::Declined, now));
        assert!(!is_overdue(tomorrow, CollaborationStatus::Requested, now));
        assert!(!is_overdue(None, CollaborationStatus::Requested, now));
    }

    #[test]
    fn deadline_equal_to_now_is_not_overdue() {
        let now = Utc::now();
        assert!(!is_overdue(Some(now), CollaborationStatus::Negotiating, now));
    }

    #[test]
    fn upcoming_window_is_inclusive() {
        let now = Utc::now();
        let week = Duration::days(7);

        assert!(is_upcoming(Some(now), CollaborationStatus::Requested, now, week));
        assert!(is_upcoming(Some(now + week), CollaborationStatus::Requested, now, week));
        assert!(!is_upcoming(Some(now + week + Duration::seconds(1)), CollaborationStatus::Requested, now, week));
        assert!(!is_upcoming(Some(now + Duration::days(2)), CollaborationStatus::Completed, now, week));
        assert!(!is_upcoming(Some(now - Duration::hours(1)), CollaborationStatus::Requested, now, week));
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in CollaborationStatus::ALL {
            assert_eq!(status.as_str().parse::<CollaborationStatus>().unwrap(), status);
        }
        assert!("archived".parse::<CollaborationStatus>().is_err());
        assert_eq!(CollaborationStatus::default(), CollaborationStatus::Requested);
    }

    #[test]
    fn builds_relations_from_view_row() {
        let now = Utc::now();
        let mut details = row(CollaborationStatus::Requested, Some(now - Duration::days(3)));
        let influencer = Uuid::new_v4();
        let user = Uuid::new_v4();
        details.assigned_influencer_id = Some(influencer);
        details.influencer_user_id = Some(user);
        details.influencer_full_name = Some("Mia".into());

        let collab = CollaborationWithRelations::from_row(details, now);
        assert!(collab.is_overdue);
        assert_eq!(collab.company.name, "Acme");
        assert_eq!(
            collab.assigned_influencer,
            Some(InfluencerRef { id: influencer, user_id: user, full_name: "Mia".into() })
        );

        let json = serde_json::to_value(&collab).unwrap();
        assert_eq!(json["status"], "requested");
        assert_eq!(json["company"]["name"], "Acme");
        assert_eq!(json["is_overdue"], true);
    }

    #[test]
    fn unassigned_collaboration_has_no_influencer() {
        let collab = CollaborationWithRelations::from_row(row(CollaborationStatus::Completed, None), Utc::now());
        assert!(collab.assigned_influencer.is_none());
        assert!(!collab.is_overdue);
    }
}
