use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use super::CategoryMetadata;

/// Soft-delete flag of a ticket category, stored in `tc_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_category_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategoryStatus {
    Active,
    NotActive,
}

/// How many times a ticket of the category may be checked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_checkin_strategy", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCheckInStrategy {
    #[default]
    OncePerEvent,
    OncePerDay,
}

/// Whether attendees join in person, online, or as configured on the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_access_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketAccessType {
    #[default]
    Inherit,
    InPerson,
    Online,
}

impl std::fmt::Display for TicketAccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketAccessType::Inherit => write!(f, "INHERIT"),
            TicketAccessType::InPerson => write!(f, "IN_PERSON"),
            TicketAccessType::Online => write!(f, "ONLINE"),
        }
    }
}

/// Row of `ticket_category_with_currency`
#[derive(Debug, Clone, FromRow)]
pub struct TicketCategory {
    pub id: i32,
    pub event_id: i32,
    pub inception: DateTime<Utc>,
    pub expiration: DateTime<Utc>,
    pub name: String,
    pub max_tickets: i32,
    pub price_cts: i32,
    pub src_price_cts: i32,
    pub access_restricted: bool,
    #[sqlx(rename = "tc_status")]
    pub status: TicketCategoryStatus,
    pub bounded: bool,
    #[sqlx(rename = "category_code")]
    pub code: Option<String>,
    pub valid_checkin_from: Option<DateTime<Utc>>,
    pub valid_checkin_to: Option<DateTime<Utc>>,
    pub ticket_validity_start: Option<DateTime<Utc>>,
    pub ticket_validity_end: Option<DateTime<Utc>>,
    pub ordinal: i32,
    pub ticket_checkin_strategy: TicketCheckInStrategy,
    pub metadata: Json<CategoryMetadata>,
    pub ticket_access_type: TicketAccessType,
    pub currency_code: Option<String>,
}

impl TicketCategory {
    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    pub fn is_free(&self) -> bool {
        self.src_price_cts == 0
    }

    /// A category is sellable only between inception and expiration
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration < now
    }

    #[allow(dead_code)]
    pub fn is_active(&self) -> bool {
        self.status == TicketCategoryStatus::Active
    }
}

/// Fields written by insert and full update
#[derive(Debug, Clone)]
pub struct TicketCategoryData {
    pub inception: DateTime<Utc>,
    pub expiration: DateTime<Utc>,
    pub name: String,
    pub max_tickets: i32,
    pub access_restricted: bool,
    pub bounded: bool,
    pub price_cts: i32,
    pub code: Option<String>,
    pub valid_checkin_from: Option<DateTime<Utc>>,
    pub valid_checkin_to: Option<DateTime<Utc>>,
    pub ticket_validity_start: Option<DateTime<Utc>>,
    pub ticket_validity_end: Option<DateTime<Utc>>,
    pub ordinal: i32,
    pub ticket_checkin_strategy: TicketCheckInStrategy,
    pub metadata: CategoryMetadata,
    pub ticket_access_type: TicketAccessType,
}

/// Columns a full update changes only when set
#[derive(Debug, Clone, Default)]
pub struct TicketCategoryChanges {
    pub bounded: Option<bool>,
    pub ordinal: Option<i32>,
    pub metadata: Option<CategoryMetadata>,
}

/// Projection of `select id, metadata from ticket_category`
#[derive(Debug, Clone, FromRow)]
pub struct EntityIdAndMetadata {
    pub id: i32,
    pub metadata: Option<Json<CategoryMetadata>>,
}
