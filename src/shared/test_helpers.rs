#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::shared::constants::ROLE_ADMIN;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use sqlx::PgPool;

/// Pool that never connects unless a query runs; for handler tests rejected before the database
#[cfg(test)]
pub fn lazy_pool() -> PgPool {
    PgPool::connect_lazy("postgres://localhost/ticketing_test").unwrap()
}

#[cfg(test)]
pub fn create_user(roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-account-id".to_string(),
        sub: "test-sub".to_string(),
        session_uid: Some("test-session-uid".to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_user(&[ROLE_ADMIN]));
    next.run(request).await
}

#[cfg(test)]
async fn inject_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_user(&["attendee"]));
    next.run(request).await
}

#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// Authenticated, but without any administrative role
#[cfg(test)]
pub fn with_user_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_user_middleware))
}
