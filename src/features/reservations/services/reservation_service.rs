use sqlx::types::Json;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::reservations::dtos::{
    ReservationConfirmationDto, ReservationConfirmationRequest,
};
use crate::features::reservations::models::{
    PaymentProvider, TicketsReservation, CONFIRMABLE_STATUSES, STATUS_COMPLETE,
};
use crate::features::ticket_categories::TicketCategoryRepository;

/// Service for confirming reservations once payment has been settled
pub struct ReservationService {
    pool: PgPool,
    categories: TicketCategoryRepository,
}

impl ReservationService {
    pub fn new(pool: PgPool, categories: TicketCategoryRepository) -> Self {
        Self { pool, categories }
    }

    /// Mark a pending reservation as complete and its tickets as acquired.
    ///
    /// The reservation row is locked before its state is checked, so two
    /// concurrent confirmations of the same reservation cannot both succeed.
    pub async fn confirm(
        &self,
        event_id: i32,
        reservation_id: &str,
        request: ReservationConfirmationRequest,
    ) -> Result<ReservationConfirmationDto> {
        let provider = request.payment_provider().ok_or_else(|| {
            AppError::Validation("transaction.paymentProvider is required".to_string())
        })?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin reservation confirmation: {:?}", e);
            AppError::Database(e)
        })?;

        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM tickets_reservation WHERE id = $1 AND event_id = $2 FOR UPDATE",
        )
        .bind(reservation_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock reservation: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Reservation {} not found in event {}",
                reservation_id, event_id
            ))
        })?;

        if !CONFIRMABLE_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Conflict(format!(
                "Reservation {} is {} and cannot be confirmed",
                reservation_id, status
            )));
        }

        let categories = self
            .categories
            .find_categories_in_reservation(reservation_id)
            .await?;
        let category_ids: Vec<i32> = categories.iter().map(|c| c.id).collect();

        if !provider.accepts_payment() {
            let paid = self
                .categories
                .count_paid_categories_in_reservation(&category_ids)
                .await?;
            if paid > 0 {
                return Err(AppError::Validation(format!(
                    "Reservation {} contains paid tickets and cannot be confirmed with provider {}",
                    reservation_id, provider
                )));
            }
        }

        let notification = request.notification();
        let transaction = request.transaction.clone().unwrap_or_default();

        let reservation = sqlx::query_as::<_, TicketsReservation>(
            r#"
            UPDATE tickets_reservation
            SET status = $3,
                payment_method = $4,
                transaction_id = $5,
                transaction_timestamp = COALESCE($6, NOW()),
                transaction_notes = $7,
                billing_data = COALESCE($8, billing_data),
                notification = $9,
                confirmation_ts = NOW()
            WHERE id = $1 AND event_id = $2
            RETURNING id, event_id, status, payment_method, transaction_id, confirmation_ts
            "#,
        )
        .bind(reservation_id)
        .bind(event_id)
        .bind(STATUS_COMPLETE)
        .bind(provider.as_str())
        .bind(transaction.id.as_deref())
        .bind(transaction.timestamp)
        .bind(transaction.notes.as_deref())
        .bind(request.billing_data.as_ref().map(Json))
        .bind(Json(notification))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to confirm reservation: {:?}", e);
            AppError::Database(e)
        })?;

        let tickets_acquired = sqlx::query(
            r#"
            UPDATE ticket SET status = 'ACQUIRED'
            WHERE tickets_reservation_id = $1
              AND status IN ('PENDING', 'OFFLINE_PAYMENT', 'TO_BE_PAID')
            "#,
        )
        .bind(reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to acquire reservation tickets: {:?}", e);
            AppError::Database(e)
        })?
        .rows_affected();

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit reservation confirmation: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Reservation {} confirmed via {} ({} tickets acquired)",
            reservation.id,
            provider,
            tickets_acquired
        );

        Ok(ReservationConfirmationDto {
            reservation_id: reservation.id,
            event_id: reservation.event_id,
            status: reservation.status,
            payment_provider: provider,
            transaction_id: reservation.transaction_id,
            confirmed_at: reservation.confirmation_ts,
            tickets_acquired,
            category_ids,
            notification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reservations::dtos::{
        Notification, ReservationBillingData, TransactionDetails,
    };
    use crate::features::ticket_categories::models::{
        CategoryMetadata, TicketAccessType, TicketCategoryData, TicketCheckInStrategy,
    };
    use chrono::{Duration, Utc};

    fn request(provider: PaymentProvider) -> ReservationConfirmationRequest {
        ReservationConfirmationRequest::new(
            Some(TransactionDetails {
                id: Some("tx-42".to_string()),
                timestamp: None,
                notes: Some("paid at the desk".to_string()),
                payment_provider: Some(provider),
            }),
            Some(Notification {
                customer: true,
                attendees: false,
            }),
            None,
        )
    }

    fn billing() -> ReservationBillingData {
        ReservationBillingData {
            company_name: Some("ACME".to_string()),
            country: Some("CH".to_string()),
            ..Default::default()
        }
    }

    #[derive(sqlx::FromRow)]
    struct PersistedConfirmation {
        transaction_notes: Option<String>,
        notification: Json<Notification>,
        billing_data: Json<ReservationBillingData>,
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_before_database() {
        let pool = crate::shared::test_helpers::lazy_pool();
        let service = ReservationService::new(pool.clone(), TicketCategoryRepository::new(pool));

        let result = service
            .confirm(1, "res-1", ReservationConfirmationRequest::default())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    async fn seed(pool: &PgPool, price_cts: i32) -> (i32, i32) {
        let event_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO event(short_name, display_name, currency)
            VALUES ('confirm', 'Confirm', 'EUR') RETURNING id
            "#,
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let now = Utc::now();
        let category_id = TicketCategoryRepository::new(pool.clone())
            .insert(
                event_id,
                &TicketCategoryData {
                    inception: now - Duration::days(1),
                    expiration: now + Duration::days(1),
                    name: "Regular".to_string(),
                    max_tickets: 10,
                    access_restricted: false,
                    bounded: true,
                    price_cts,
                    code: None,
                    valid_checkin_from: None,
                    valid_checkin_to: None,
                    ticket_validity_start: None,
                    ticket_validity_end: None,
                    ordinal: 0,
                    ticket_checkin_strategy: TicketCheckInStrategy::OncePerEvent,
                    metadata: CategoryMetadata::empty(),
                    ticket_access_type: TicketAccessType::Inherit,
                },
            )
            .await
            .unwrap();

        sqlx::query(
            r#"
            INSERT INTO tickets_reservation(id, event_id, status)
            VALUES ('res-1', $1, 'OFFLINE_PAYMENT')
            "#,
        )
        .bind(event_id)
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            r#"
            INSERT INTO ticket(event_id, category_id, status, tickets_reservation_id)
            VALUES ($1, $2, 'OFFLINE_PAYMENT', 'res-1')
            "#,
        )
        .bind(event_id)
        .bind(category_id)
        .execute(pool)
        .await
        .unwrap();

        (event_id, category_id)
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_confirm_completes_reservation_once(pool: PgPool) {
        let (event_id, category_id) = seed(&pool, 2000).await;
        let service =
            ReservationService::new(pool.clone(), TicketCategoryRepository::new(pool.clone()));

        let mut with_billing = request(PaymentProvider::Offline);
        with_billing.billing_data = Some(billing());

        let confirmed = service
            .confirm(event_id, "res-1", with_billing)
            .await
            .unwrap();
        assert_eq!(confirmed.status, STATUS_COMPLETE);
        assert_eq!(confirmed.tickets_acquired, 1);
        assert_eq!(confirmed.category_ids, vec![category_id]);
        assert_eq!(confirmed.transaction_id.as_deref(), Some("tx-42"));

        let persisted = sqlx::query_as::<_, PersistedConfirmation>(
            r#"
            SELECT transaction_notes, notification, billing_data
            FROM tickets_reservation WHERE id = 'res-1'
            "#,
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        let notes = persisted.transaction_notes.as_deref();
        assert_eq!(notes, Some("paid at the desk"));
        assert!(persisted.notification.0.customer);
        assert_eq!(persisted.notification.0, confirmed.notification);
        assert_eq!(persisted.billing_data.0, billing());

        let again = service
            .confirm(event_id, "res-1", request(PaymentProvider::Offline))
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let missing = service
            .confirm(event_id, "res-unknown", request(PaymentProvider::Offline))
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_free_provider_refused_for_paid_tickets(pool: PgPool) {
        let (event_id, _) = seed(&pool, 2000).await;
        let service =
            ReservationService::new(pool.clone(), TicketCategoryRepository::new(pool.clone()));

        let result = service
            .confirm(event_id, "res-1", request(PaymentProvider::None))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_completed_reservation_conflicts_before_payment_check(pool: PgPool) {
        let (event_id, _) = seed(&pool, 2000).await;
        let service =
            ReservationService::new(pool.clone(), TicketCategoryRepository::new(pool.clone()));

        service
            .confirm(event_id, "res-1", request(PaymentProvider::Offline))
            .await
            .unwrap();

        let again = service
            .confirm(event_id, "res-1", request(PaymentProvider::None))
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }
}
