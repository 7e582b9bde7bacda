use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Reservation states a confirmation may start from
pub const CONFIRMABLE_STATUSES: [&str; 2] = ["PENDING", "OFFLINE_PAYMENT"];

pub const STATUS_COMPLETE: &str = "COMPLETE";

/// Payment method used to settle a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentProvider {
    Stripe,
    OnSite,
    Offline,
    /// Free of charge, no payment involved
    None,
    Admin,
    Paypal,
    Mollie,
    Saferpay,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe => "STRIPE",
            PaymentProvider::OnSite => "ON_SITE",
            PaymentProvider::Offline => "OFFLINE",
            PaymentProvider::None => "NONE",
            PaymentProvider::Admin => "ADMIN",
            PaymentProvider::Paypal => "PAYPAL",
            PaymentProvider::Mollie => "MOLLIE",
            PaymentProvider::Saferpay => "SAFERPAY",
        }
    }

    /// Whether this provider can settle a reservation containing paid tickets
    pub fn accepts_payment(&self) -> bool {
        !matches!(self, PaymentProvider::None)
    }
}

impl std::fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for a tickets reservation
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct TicketsReservation {
    pub id: String,
    pub event_id: i32,
    pub status: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub confirmation_ts: Option<DateTime<Utc>>,
}
