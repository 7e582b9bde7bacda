use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::reservations::handlers;
use crate::features::reservations::services::ReservationService;

/// Create admin routes for reservations (event admin only)
pub fn routes(service: Arc<ReservationService>) -> Router {
    Router::new()
        .route(
            "/api/admin/events/{event_id}/reservations/{reservation_id}/confirm",
            post(handlers::confirm_reservation),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ticket_categories::TicketCategoryRepository;
    use crate::shared::test_helpers::{lazy_pool, with_admin_auth, with_user_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn app() -> Router {
        let pool = lazy_pool();
        let service = ReservationService::new(pool.clone(), TicketCategoryRepository::new(pool));
        routes(Arc::new(service))
    }

    #[tokio::test]
    async fn test_confirm_requires_authentication() {
        let server = TestServer::new(app()).unwrap();

        let response = server
            .post("/api/admin/events/1/reservations/res-1/confirm")
            .json(&json!({}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_confirm_requires_admin_role() {
        let server = TestServer::new(with_user_auth(app())).unwrap();

        let response = server
            .post("/api/admin/events/1/reservations/res-1/confirm")
            .json(&json!({ "transaction": { "paymentProvider": "OFFLINE" } }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_confirm_without_payment_provider_rejected() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();

        let response = server
            .post("/api/admin/events/1/reservations/res-1/confirm")
            .json(&json!({
                "transaction": { "id": "tx-1" },
                "notification": { "customer": true, "attendees": true }
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_confirm_rejects_unknown_provider() {
        let server = TestServer::new(with_admin_auth(app())).unwrap();

        let response = server
            .post("/api/admin/events/1/reservations/res-1/confirm")
            .json(&json!({ "transaction": { "paymentProvider": "BITCOIN" } }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
