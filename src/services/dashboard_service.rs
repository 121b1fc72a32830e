use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeMap;

use super::collaboration_service::{CollaborationFilters, CollaborationQuery, StatusFilter};
use crate::database::models::collaboration::{is_upcoming, CollaborationDetailsRow};
use crate::database::models::{CollaborationStatus, CollaborationWithRelations};
use crate::database::Repository;
use crate::error::ApiError;
use crate::filter::{FilterOrderInfo, NullsOrder, SortDirection};
use crate::middleware::CurrentProfile;
use crate::types::{Operation, Resource};

/// Deadlines within this many days count as upcoming
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCounts {
    pub total: usize,
    pub overdue: usize,
    pub upcoming: usize,
    pub by_status: BTreeMap<&'static str, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub overdue: Vec<CollaborationWithRelations>,
    pub upcoming: Vec<CollaborationWithRelations>,
    pub filtered: Vec<CollaborationWithRelations>,
    pub counts: DashboardCounts,
}

impl Dashboard {
    /// Splits collaborations (already ordered by deadline) into the dashboard buckets
    pub fn summarize(collaborations: Vec<CollaborationWithRelations>, status: StatusFilter, now: DateTime<Utc>) -> Self {
        let window = Duration::days(UPCOMING_WINDOW_DAYS);

        let mut by_status: BTreeMap<&'static str, usize> =
            CollaborationStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
        for collab in &collaborations {
            *by_status.entry(collab.status.as_str()).or_default() += 1;
        }

        let overdue: Vec<_> = collaborations.iter().filter(|c| c.is_overdue).cloned().collect();
        let upcoming: Vec<_> = collaborations
            .iter()
            .filter(|c| is_upcoming(c.deadline, c.status, now, window))
            .cloned()
            .collect();
        let filtered: Vec<_> = match status {
            StatusFilter::All => collaborations.clone(),
            StatusFilter::Overdue => overdue.clone(),
            StatusFilter::Is(wanted) => collaborations.iter().filter(|c| c.status == wanted).cloned().collect(),
        };

        Self {
            counts: DashboardCounts {
                total: collaborations.len(),
                overdue: overdue.len(),
                upcoming: upcoming.len(),
                by_status,
            },
            overdue,
            upcoming,
            filtered,
        }
    }
}

pub struct DashboardService {
    pool: PgPool,
    profile: CurrentProfile,
}

impl DashboardService {
    pub fn new(pool: PgPool, profile: CurrentProfile) -> Self {
        Self { pool, profile }
    }

    pub async fn load(&self, params: DashboardParams) -> Result<Dashboard, ApiError> {
        let access = self.profile.require(Resource::Dashboard, Operation::Select)?;
        let status = StatusFilter::parse(params.status.as_deref())?;
        let now = Utc::now();

        let repo: Repository<CollaborationDetailsRow> = Repository::new(
            super::collaboration_service::COLLABORATION_VIEW,
            self.profile.organization_id,
            self.pool.clone(),
        );
        let mut filter = CollaborationQuery::conditions(
            &CollaborationFilters::default(),
            now,
            self.profile.organization_id,
            self.profile.assigned_scope(access),
        )?;
        filter.order(FilterOrderInfo { column: "deadline".into(), sort: SortDirection::Asc, nulls: Some(NullsOrder::Last) });

        let rows = repo.select_any(filter).await?;
        let collaborations = rows.into_iter().map(|row| CollaborationWithRelations::from_row(row, now)).collect();

        Ok(Dashboard::summarize(collaborations, status, now))
    }
}
