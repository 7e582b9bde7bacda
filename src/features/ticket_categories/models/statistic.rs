use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Row of the `ticket_category_statistics` view, computed by the database
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct TicketCategoryStatisticView {
    #[sqlx(rename = "ticket_category_id")]
    pub id: i32,
    pub event_id: i32,
    pub max_tickets: i32,
    pub bounded: bool,
    pub access_restricted: bool,
    #[sqlx(rename = "is_expired")]
    pub expired: bool,
    pub sold_tickets_count: i64,
    pub checked_in_count: i64,
    pub pending_count: i64,
    pub released_count: i64,
    #[sqlx(rename = "not_sold_tickets")]
    pub not_sold_tickets_count: i64,
}

impl TicketCategoryStatisticView {
    /// True when a buyer could still obtain a ticket from this category
    #[allow(dead_code)]
    pub fn has_available_tickets(&self) -> bool {
        !self.expired && (!self.bounded || self.not_sold_tickets_count > 0)
    }
}
