use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reservations::models::PaymentProvider;

/// Payment transaction that settled a reservation
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    /// Identifier assigned by the payment provider
    pub id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub payment_provider: Option<PaymentProvider>,
}

/// Who gets an email once the reservation is confirmed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub customer: bool,
    #[serde(default)]
    pub attendees: bool,
}

impl Notification {
    pub const EMPTY: Notification = Notification {
        customer: false,
        attendees: false,
    };

    pub fn or_empty(notification: Option<Notification>) -> Notification {
        notification.unwrap_or(Self::EMPTY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationBillingData {
    pub company_name: Option<String>,
    pub vat_nr: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Request DTO for confirming a reservation after payment
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReservationConfirmationRequest {
    pub transaction: Option<TransactionDetails>,
    notification: Option<Notification>,
    #[serde(rename = "billingData")]
    pub billing_data: Option<ReservationBillingData>,
}

impl ReservationConfirmationRequest {
    #[allow(dead_code)]
    pub fn new(
        transaction: Option<TransactionDetails>,
        notification: Option<Notification>,
        billing_data: Option<ReservationBillingData>,
    ) -> Self {
        Self {
            transaction,
            notification,
            billing_data,
        }
    }

    /// Notification preferences; absent preferences read as [`Notification::EMPTY`]
    pub fn notification(&self) -> Notification {
        Notification::or_empty(self.notification)
    }

    pub fn payment_provider(&self) -> Option<PaymentProvider> {
        self.transaction.as_ref().and_then(|t| t.payment_provider)
    }

    /// A confirmation must name the payment provider of its transaction
    pub fn is_valid(&self) -> bool {
        self.payment_provider().is_some()
    }
}

/// Response DTO for a confirmed reservation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationConfirmationDto {
    pub reservation_id: String,
    pub event_id: i32,
    pub status: String,
    pub payment_provider: PaymentProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub tickets_acquired: u64,
    pub category_ids: Vec<i32>,
    pub notification: Notification,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transaction(provider: Option<PaymentProvider>) -> TransactionDetails {
        TransactionDetails {
            id: Some("tx-1".to_string()),
            timestamp: None,
            notes: None,
            payment_provider: provider,
        }
    }

    #[test]
    fn test_invalid_without_transaction() {
        let request = ReservationConfirmationRequest::new(None, None, None);
        assert!(!request.is_valid());
    }

    #[test]
    fn test_invalid_without_payment_provider() {
        let request = ReservationConfirmationRequest::new(
            Some(transaction(None)),
            Some(Notification {
                customer: true,
                attendees: true,
            }),
            Some(ReservationBillingData::default()),
        );
        assert!(!request.is_valid());
    }

    #[test]
    fn test_valid_regardless_of_notification_and_billing() {
        let details = transaction(Some(PaymentProvider::Offline));
        let request = ReservationConfirmationRequest::new(Some(details), None, None);
        assert!(request.is_valid());
    }

    #[test]
    fn test_missing_notification_reads_as_empty() {
        let implicit = ReservationConfirmationRequest::new(None, None, None);
        let explicit = ReservationConfirmationRequest::new(None, Some(Notification::EMPTY), None);

        assert_eq!(implicit.notification(), Notification::EMPTY);
        assert_eq!(implicit.notification(), explicit.notification());
    }

    #[test]
    fn test_deserialize_wire_format() {
        let request: ReservationConfirmationRequest = serde_json::from_value(json!({
            "transaction": {
                "id": "pi_123",
                "timestamp": "2026-02-01T10:00:00Z",
                "paymentProvider": "STRIPE"
            },
            "notification": { "customer": true, "attendees": false },
            "billingData": { "companyName": "ACME", "vatNr": "CHE-123", "country": "CH" }
        }))
        .unwrap();

        assert!(request.is_valid());
        assert_eq!(request.payment_provider(), Some(PaymentProvider::Stripe));
        assert!(request.notification().customer);
        assert!(!request.notification().attendees);
        let billing = request.billing_data.unwrap();
        assert_eq!(billing.company_name.as_deref(), Some("ACME"));
        assert_eq!(billing.vat_nr.as_deref(), Some("CHE-123"));
    }

    #[test]
    fn test_deserialize_empty_body() {
        let request: ReservationConfirmationRequest = serde_json::from_value(json!({})).unwrap();
        assert!(!request.is_valid());
        assert_eq!(request.notification(), Notification::EMPTY);
    }
}
