use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::ticket_categories::models::{
    CategoryMetadata, TicketAccessType, TicketCategory, TicketCategoryData, TicketCategoryStatus,
    TicketCheckInStrategy,
};
use crate::shared::validation::CATEGORY_CODE_REGEX;

fn default_true() -> bool {
    true
}

/// Request DTO for creating or fully updating a ticket category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_category_windows"))]
pub struct TicketCategoryRequestDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Start of the sale period
    pub inception: DateTime<Utc>,

    /// End of the sale period
    pub expiration: DateTime<Utc>,

    /// Capacity of the category, ignored for unbounded categories
    #[validate(range(min = 0, message = "maxTickets must not be negative"))]
    pub max_tickets: i32,

    #[serde(default = "default_true")]
    pub bounded: bool,

    /// Price in cents
    #[validate(range(min = 0, message = "priceCts must not be negative"))]
    pub price_cts: i32,

    #[serde(default)]
    pub access_restricted: bool,

    /// Optional code, unique among the active categories of the event
    #[validate(
        length(min = 1, max = 255),
        regex(
            path = *CATEGORY_CODE_REGEX,
            message = "code may only contain letters, digits, '-' and '_'"
        )
    )]
    pub code: Option<String>,

    #[serde(rename = "validCheckInFrom")]
    pub valid_checkin_from: Option<DateTime<Utc>>,
    #[serde(rename = "validCheckInTo")]
    pub valid_checkin_to: Option<DateTime<Utc>>,
    pub ticket_validity_start: Option<DateTime<Utc>>,
    pub ticket_validity_end: Option<DateTime<Utc>>,

    /// Display position; 0 on create when absent, unchanged on update when absent
    pub ordinal: Option<i32>,

    #[serde(default)]
    pub ticket_checkin_strategy: TicketCheckInStrategy,

    #[serde(default)]
    pub ticket_access_type: TicketAccessType,

    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<CategoryMetadata>,
}

fn validate_category_windows(dto: &TicketCategoryRequestDto) -> Result<(), ValidationError> {
    fn ordered(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> bool {
        match (from, to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }

    if dto.expiration <= dto.inception {
        return Err(window_error("sale_window", "expiration must be after inception"));
    }
    if !ordered(dto.valid_checkin_from, dto.valid_checkin_to) {
        let message = "validCheckInFrom must not be after validCheckInTo";
        return Err(window_error("checkin_window", message));
    }
    if !ordered(dto.ticket_validity_start, dto.ticket_validity_end) {
        let message = "ticketValidityStart must not be after ticketValidityEnd";
        return Err(window_error("validity_window", message));
    }
    Ok(())
}

fn window_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

impl From<TicketCategoryRequestDto> for TicketCategoryData {
    fn from(dto: TicketCategoryRequestDto) -> Self {
        Self {
            inception: dto.inception,
            expiration: dto.expiration,
            name: dto.name,
            max_tickets: dto.max_tickets,
            access_restricted: dto.access_restricted,
            bounded: dto.bounded,
            price_cts: dto.price_cts,
            code: dto.code,
            valid_checkin_from: dto.valid_checkin_from,
            valid_checkin_to: dto.valid_checkin_to,
            ticket_validity_start: dto.ticket_validity_start,
            ticket_validity_end: dto.ticket_validity_end,
            ordinal: dto.ordinal.unwrap_or_default(),
            ticket_checkin_strategy: dto.ticket_checkin_strategy,
            metadata: dto.metadata.unwrap_or_default(),
            ticket_access_type: dto.ticket_access_type,
        }
    }
}

/// Response DTO for ticket category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketCategoryResponseDto {
    pub id: i32,
    pub event_id: i32,
    pub name: String,
    pub inception: DateTime<Utc>,
    pub expiration: DateTime<Utc>,
    pub max_tickets: i32,
    pub bounded: bool,
    pub price_cts: i32,
    pub src_price_cts: i32,
    pub free: bool,
    /// Sale period already over
    pub expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    pub access_restricted: bool,
    pub status: TicketCategoryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "validCheckInFrom")]
    pub valid_checkin_from: Option<DateTime<Utc>>,
    #[serde(rename = "validCheckInTo")]
    pub valid_checkin_to: Option<DateTime<Utc>>,
    pub ticket_validity_start: Option<DateTime<Utc>>,
    pub ticket_validity_end: Option<DateTime<Utc>>,
    pub ordinal: i32,
    pub ticket_checkin_strategy: TicketCheckInStrategy,
    pub ticket_access_type: TicketAccessType,
    #[schema(value_type = Object)]
    pub metadata: CategoryMetadata,
}

impl From<TicketCategory> for TicketCategoryResponseDto {
    fn from(c: TicketCategory) -> Self {
        let free = c.is_free();
        let expired = c.is_expired_at(Utc::now());
        Self {
            id: c.id,
            event_id: c.event_id,
            name: c.name,
            inception: c.inception,
            expiration: c.expiration,
            max_tickets: c.max_tickets,
            bounded: c.bounded,
            price_cts: c.price_cts,
            src_price_cts: c.src_price_cts,
            free,
            expired,
            currency_code: c.currency_code,
            access_restricted: c.access_restricted,
            status: c.status,
            code: c.code,
            valid_checkin_from: c.valid_checkin_from,
            valid_checkin_to: c.valid_checkin_to,
            ticket_validity_start: c.ticket_validity_start,
            ticket_validity_end: c.ticket_validity_end,
            ordinal: c.ordinal,
            ticket_checkin_strategy: c.ticket_checkin_strategy,
            ticket_access_type: c.ticket_access_type,
            metadata: c.metadata.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityDto {
    #[validate(range(min = 0, message = "maxTickets must not be negative"))]
    pub max_tickets: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOrdinalDto {
    pub id: i32,
    pub ordinal: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrdinalsDto {
    #[validate(length(min = 1, message = "At least one ordinal is required"))]
    pub ordinals: Vec<CategoryOrdinalDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccessTypeDto {
    pub ticket_access_type: TicketAccessType,
}

/// Seats reserved by the bounded categories of an event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketAllocationDto {
    pub event_id: i32,
    pub allocation: i64,
}
