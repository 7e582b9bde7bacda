//! Role-based authorization guards.
//!
//! Each guard reads the [`AuthenticatedUser`] placed in the request extensions by
//! the auth middleware. A missing user yields 401, a user without the role 403.
//!
//! Roles (from highest to lowest):
//! - super_admin: global admin, passes every guard
//! - admin: manages ticket categories and confirms reservations

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated_user(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for checking if user is super admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireSuperAdmin(user): RequireSuperAdmin) { ... }
/// ```
#[allow(dead_code)]
pub struct RequireSuperAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated_user(parts)?;

        if !user.is_super_admin() {
            return Err(AppError::Forbidden(
                "Super admin access required".to_string(),
            ));
        }

        Ok(RequireSuperAdmin(user.clone()))
    }
}

/// Guard for event administration endpoints.
///
/// Allows users with "super_admin" or "admin" roles.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireEventAdmin(user): RequireEventAdmin) { ... }
/// ```
pub struct RequireEventAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireEventAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated_user(parts)?;

        if !user.has_event_admin_access() {
            return Err(AppError::Forbidden(
                "Event admin access required".to_string(),
            ));
        }

        Ok(RequireEventAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::create_user;
    use axum::http::Request;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let (mut parts, _) = Request::new(()).into_parts();
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    #[tokio::test]
    async fn test_event_admin_guard_missing_user() {
        let mut parts = parts_with(None);
        let result = RequireEventAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_event_admin_guard_roles() {
        let mut parts = parts_with(Some(create_user(&["attendee"])));
        let result = RequireEventAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let mut parts = parts_with(Some(create_user(&["super_admin"])));
        assert!(RequireEventAdmin::from_request_parts(&mut parts, &())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_super_admin_guard_rejects_admin() {
        let mut parts = parts_with(Some(create_user(&["admin"])));
        let result = RequireSuperAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
