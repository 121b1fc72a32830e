use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use super::auth::AuthUser;
use crate::auth::{authorize, policy::denied_message, Access};
use crate::database::models::{UserProfile, UserRole};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::types::{Operation, Resource};

/// Caller's profile, resolved once per request
#[derive(Clone, Debug)]
pub struct CurrentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: UserRole,
    pub full_name: String,
}

impl From<UserProfile> for CurrentProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            organization_id: profile.organization_id,
            role: profile.role,
            full_name: profile.full_name,
        }
    }
}

impl CurrentProfile {
    /// Applies the role policy, turning a denial into 403
    pub fn require(&self, resource: Resource, operation: Operation) -> Result<Access, ApiError> {
        let access = authorize(self.role, resource, operation);
        if access.is_denied() {
            tracing::warn!(
                profile_id = %self.id,
                role = %self.role,
                ?resource,
                ?operation,
                "Access denied"
            );
            return Err(ApiError::forbidden(denied_message(resource, operation)));
        }
        Ok(access)
    }

    /// Influencer id the caller is restricted to, if any
    pub fn assigned_scope(&self, access: Access) -> Option<Uuid> {
        match access {
            Access::Assigned => Some(self.id),
            _ => None,
        }
    }
}

/// Loads the caller's profile for the user id in the token. Must run after `jwt_auth_middleware`.
pub async fn profile_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let pool = DatabaseManager::pool().await?;
    let profile = sqlx::query_as::<_, UserProfile>(
        "SELECT id, user_id, organization_id, role, full_name, created_at, updated_at FROM user_profiles WHERE user_id = $1",
    )
    .bind(auth_user.user_id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Database error loading profile for user {}: {}", auth_user.user_id, e);
        ApiError::internal_server_error("Failed to load user profile")
    })?;

    let profile = profile.ok_or_else(|| {
        tracing::warn!("No profile for authenticated user {}", auth_user.user_id);
        ApiError::not_found("User profile not found")
    })?;

    let current = CurrentProfile::from(profile);
    tracing::debug!(
        "Resolved profile {} ({}) in organization {}",
        current.id,
        current.role,
        current.organization_id
    );

    request.extensions_mut().insert(current);

    Ok(next.run(request).await)
}
