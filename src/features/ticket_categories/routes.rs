use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::ticket_categories::handlers;
use crate::features::ticket_categories::services::TicketCategoryService;

/// Create admin routes for ticket categories (event admin only)
pub fn routes(service: Arc<TicketCategoryService>) -> Router {
    Router::new()
        .route(
            "/api/admin/events/{event_id}/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/admin/events/{event_id}/categories/ordinals",
            put(handlers::update_ordinals),
        )
        .route(
            "/api/admin/events/{event_id}/categories/access-type",
            put(handlers::update_access_type),
        )
        .route(
            "/api/admin/events/{event_id}/categories/statistics",
            get(handlers::list_statistics),
        )
        .route(
            "/api/admin/events/{event_id}/categories/first-available",
            get(handlers::get_first_available),
        )
        .route(
            "/api/admin/events/{event_id}/categories/{category_id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/admin/events/{event_id}/categories/{category_id}/availability",
            put(handlers::update_availability),
        )
        .route(
            "/api/admin/events/{event_id}/categories/{category_id}/metadata",
            get(handlers::get_metadata).put(handlers::update_metadata),
        )
        .route(
            "/api/admin/events/{event_id}/allocation",
            get(handlers::get_allocation),
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

    fn server(router: Router) -> TestServer {
        TestServer::new(router).unwrap()
    }

    fn app() -> Router {
        let service = TicketCategoryService::new(TicketCategoryRepository::new(lazy_pool()));
        routes(Arc::new(service))
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let server = server(app());

        let response = server.get("/api/admin/events/1/categories").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_requires_admin_role() {
        let server = server(with_user_auth(app()));

        let response = server.get("/api/admin/events/1/categories").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_sale_window() {
        let server = server(with_admin_auth(app()));

        let response = server
            .post("/api/admin/events/1/categories")
            .json(&json!({
                "name": "Regular",
                "inception": "2026-03-01T09:00:00Z",
                "expiration": "2026-01-01T09:00:00Z",
                "maxTickets": 10,
                "priceCts": 1000
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let server = server(with_admin_auth(app()));

        let response = server
            .post("/api/admin/events/1/categories")
            .json(&json!({ "name": "Missing dates" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Invalid JSON data")));
    }

    #[tokio::test]
    async fn test_ordinals_require_at_least_one_entry() {
        let server = server(with_admin_auth(app()));

        let response = server
            .put("/api/admin/events/1/categories/ordinals")
            .json(&json!({ "ordinals": [] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_negative_availability_rejected() {
        let server = server(with_admin_auth(app()));

        let response = server
            .put("/api/admin/events/1/categories/3/availability")
            .json(&json!({ "maxTickets": -4 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
