use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgExecutor;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::ticket_categories::models::{
    CategoryMetadata, EntityIdAndMetadata, TicketAccessType, TicketCategory, TicketCategoryChanges,
    TicketCategoryData, TicketCategoryStatisticView, TicketCheckInStrategy,
};

/// Statement template for re-ordering categories, bound as
/// `(ordinal, id, event_id)` once per category by [`TicketCategoryRepository::update_ordinals`].
pub const UPDATE_ORDINAL: &str =
    "UPDATE ticket_category SET ordinal = $1 WHERE id = $2 AND event_id = $3";

/// Convert database error to a more specific AppError
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation (PostgreSQL error code 23505)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict(
                "A ticket category with this code already exists in the event".to_string(),
            );
        }

        // Foreign key violation (PostgreSQL error code 23503)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::BadRequest("Referenced event does not exist".to_string());
        }
    }

    AppError::Database(e)
}

fn log_db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("Failed to {}: {:?}", operation, e);
        handle_db_error(e)
    }
}

/// Data access for `ticket_category` and its derived views.
///
/// Lookups are scoped to an event and to active rows unless the method name
/// says otherwise. Methods prefixed with `get_` require the row to exist and
/// return [`AppError::NotFound`] when it does not; `find_`/`get_optional_`
/// methods return `None` instead.
#[derive(Clone)]
pub struct TicketCategoryRepository {
    pool: PgPool,
}

impl TicketCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new category with status `ACTIVE`, returning its generated id
    pub async fn insert(&self, event_id: i32, data: &TicketCategoryData) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO ticket_category(inception, expiration, name, max_tickets, price_cts, src_price_cts,
                access_restricted, tc_status, event_id, bounded, category_code, valid_checkin_from,
                valid_checkin_to, ticket_validity_start, ticket_validity_end, ordinal,
                ticket_checkin_strategy, metadata, ticket_access_type)
            VALUES ($1, $2, $3, $4, 0, $5, $6, 'ACTIVE', $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16::jsonb, $17::ticket_access_type)
            RETURNING id
            "#,
        )
        .bind(data.inception)
        .bind(data.expiration)
        .bind(&data.name)
        .bind(data.max_tickets)
        .bind(data.price_cts)
        .bind(data.access_restricted)
        .bind(event_id)
        .bind(data.bounded)
        .bind(data.code.as_deref())
        .bind(data.valid_checkin_from)
        .bind(data.valid_checkin_to)
        .bind(data.ticket_validity_start)
        .bind(data.ticket_validity_end)
        .bind(data.ordinal)
        .bind(data.ticket_checkin_strategy)
        .bind(Json(&data.metadata))
        .bind(data.ticket_access_type)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("insert ticket category"))?;

        Ok(id)
    }

    pub async fn get_by_id_and_active(&self, id: i32, event_id: i32) -> Result<TicketCategory> {
        self.get_optional_by_id_and_active(id, event_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Ticket category {} not found in event {}",
                    id, event_id
                ))
            })
    }

    pub async fn check_category_exists_for_event(&self, id: i32, event_id: i32) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT id FROM ticket_category
                WHERE id = $1 AND event_id = $2 AND tc_status = 'ACTIVE'
            )
            "#,
        )
        .bind(id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("check ticket category existence"))
    }

    pub async fn count_categories_belonging_to_event(
        &self,
        event_id: i32,
        category_ids: &[i32],
    ) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM ticket_category
            WHERE id = ANY($1) AND event_id = $2 AND tc_status = 'ACTIVE'
            "#,
        )
        .bind(category_ids)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("count ticket categories of event"))
    }

    /// Active categories of the event among `ids`; unknown ids are skipped
    #[allow(dead_code)]
    pub async fn get_by_ids_and_active(
        &self,
        ids: &[i32],
        event_id: i32,
    ) -> Result<Vec<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            r#"
            SELECT * FROM ticket_category_with_currency
            WHERE id = ANY($1) AND event_id = $2 AND tc_status = 'ACTIVE'
            "#,
        )
        .bind(ids)
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(log_db_error("list ticket categories by ids"))
    }

    pub async fn get_optional_by_id_and_active(
        &self,
        id: i32,
        event_id: i32,
    ) -> Result<Option<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            r#"
            SELECT * FROM ticket_category_with_currency
            WHERE id = $1 AND event_id = $2 AND tc_status = 'ACTIVE'
            "#,
        )
        .bind(id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error("get ticket category"))
    }

    /// Active category by id, regardless of the event
    #[allow(dead_code)]
    pub async fn find_active_by_id(&self, id: i32) -> Result<Option<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            "SELECT * FROM ticket_category_with_currency WHERE id = $1 AND tc_status = 'ACTIVE'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error("get active ticket category"))
    }

    /// Category by id in any status
    #[allow(dead_code)]
    pub async fn get_by_id(&self, id: i32) -> Result<TicketCategory> {
        sqlx::query_as::<_, TicketCategory>(
            "SELECT * FROM ticket_category_with_currency WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error("get ticket category by id"))?
        .ok_or_else(|| AppError::NotFound(format!("Ticket category {} not found", id)))
    }

    #[allow(dead_code)]
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            "SELECT * FROM ticket_category_with_currency WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(log_db_error("find ticket categories by ids"))
    }

    pub async fn find_code_in_event(
        &self,
        event_id: i32,
        code: &str,
    ) -> Result<Option<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            r#"
            SELECT * FROM ticket_category_with_currency
            WHERE event_id = $1 AND category_code = $2 AND tc_status = 'ACTIVE'
            "#,
        )
        .bind(event_id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error("find ticket category by code"))
    }

    #[allow(dead_code)]
    pub async fn count_unbounded_categories_by_event_id(&self, event_id: i32) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM ticket_category_with_currency
            WHERE event_id = $1 AND tc_status = 'ACTIVE' AND bounded = FALSE
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("count unbounded ticket categories"))
    }

    #[allow(dead_code)]
    pub async fn find_unbounded_order_by_expiration_desc(
        &self,
        event_id: i32,
    ) -> Result<Vec<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            r#"
            SELECT * FROM ticket_category_with_currency
            WHERE event_id = $1 AND tc_status = 'ACTIVE' AND bounded = FALSE
            ORDER BY expiration DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(log_db_error("list unbounded ticket categories"))
    }

    /// Active categories of the event in display order
    pub async fn find_all_ticket_categories(&self, event_id: i32) -> Result<Vec<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            r#"
            SELECT * FROM ticket_category_with_currency
            WHERE event_id = $1 AND tc_status = 'ACTIVE'
            ORDER BY ordinal ASC, inception ASC, expiration ASC, id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(log_db_error("list ticket categories"))
    }

    /// First public, non-expired category that can still sell a ticket,
    /// ordered by inception, expiration, id
    pub async fn find_first_with_available_tickets(
        &self,
        event_id: i32,
    ) -> Result<Option<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            r#"
            SELECT tc.* FROM ticket_category_with_currency tc
            JOIN ticket_category_statistics tcs ON tc.id = tcs.ticket_category_id
            WHERE tc.event_id = $1
              AND tcs.is_expired IS FALSE
              AND tcs.access_restricted IS FALSE
              AND (tcs.bounded IS FALSE OR tcs.not_sold_tickets > 0)
            ORDER BY tc.inception, tc.expiration, tc.id
            LIMIT 1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error("find first available ticket category"))
    }

    #[allow(dead_code)]
    pub async fn find_by_event_id_as_map(
        &self,
        event_id: i32,
    ) -> Result<HashMap<i32, TicketCategory>> {
        Ok(index_by_id(self.find_all_ticket_categories(event_id).await?))
    }

    #[allow(dead_code)]
    pub async fn find_metadata_for_categories_in_event(
        &self,
        event_id: i32,
    ) -> Result<Vec<EntityIdAndMetadata>> {
        sqlx::query_as::<_, EntityIdAndMetadata>(
            r#"
            SELECT id, metadata FROM ticket_category
            WHERE event_id = $1 AND tc_status = 'ACTIVE'
            ORDER BY ordinal ASC, inception ASC, expiration ASC, id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(log_db_error("list ticket category metadata"))
    }

    #[allow(dead_code)]
    pub async fn find_category_metadata_for_event_group_by_category_id(
        &self,
        event_id: i32,
    ) -> Result<HashMap<i32, CategoryMetadata>> {
        Ok(metadata_by_category_id(
            self.find_metadata_for_categories_in_event(event_id).await?,
        ))
    }

    /// Counts restricted categories in any status
    #[allow(dead_code)]
    pub async fn count_access_restricted_by_event_id(&self, event_id: i32) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM ticket_category_with_currency
            WHERE event_id = $1 AND access_restricted = TRUE
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("count access restricted ticket categories"))
    }

    /// Full field update. Ordinal, bounded flag, metadata and status are
    /// managed by their dedicated operations.
    #[allow(dead_code)]
    pub async fn update(&self, id: i32, data: &TicketCategoryData) -> Result<u64> {
        write_fields(&self.pool, id, data).await
    }

    /// Full field update plus the bounded flag, ordinal and metadata changes
    /// that are set, committed as one transaction
    pub async fn update_with_changes(
        &self,
        id: i32,
        event_id: i32,
        data: &TicketCategoryData,
        changes: &TicketCategoryChanges,
    ) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(log_db_error("begin ticket category update"))?;

        let affected = write_fields(&mut *tx, id, data).await?;
        if let Some(bounded) = changes.bounded {
            write_bounded_flag(&mut *tx, id, bounded).await?;
        }
        if let Some(ordinal) = changes.ordinal {
            sqlx::query(UPDATE_ORDINAL)
                .bind(ordinal)
                .bind(id)
                .bind(event_id)
                .execute(&mut *tx)
                .await
                .map_err(log_db_error("update ticket category ordinal"))?;
        }
        if let Some(metadata) = &changes.metadata {
            write_metadata(&mut *tx, metadata, event_id, id).await?;
        }

        tx.commit()
            .await
            .map_err(log_db_error("commit ticket category update"))?;

        Ok(affected)
    }

    /// Set the capacity unless a bounded category would end up below the
    /// tickets already held. Check and write happen in the same statement;
    /// returns the number of rows changed (0 or 1).
    pub async fn update_seats_availability(&self, id: i32, max_tickets: i32) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE ticket_category SET max_tickets = $2
            FROM (
                SELECT COUNT(*) cnt FROM ticket
                WHERE category_id = $1 AND status IN (
                    'PENDING', 'TO_BE_PAID', 'ACQUIRED', 'CHECKED_IN', 'OFFLINE_PAYMENT'
                )
            ) tkts
            WHERE id = $1
              AND (bounded = FALSE OR LEAST(ticket_category.max_tickets, tkts.cnt) <= $2)
            "#,
        )
        .bind(id)
        .bind(max_tickets)
        .execute(&self.pool)
        .await
        .map_err(log_db_error("update ticket category availability"))?;

        Ok(result.rows_affected())
    }

    #[allow(dead_code)]
    pub async fn update_bounded_flag(&self, id: i32, bounded: bool) -> Result<u64> {
        write_bounded_flag(&self.pool, id, bounded).await
    }

    #[allow(dead_code)]
    pub async fn fix_dates(
        &self,
        id: i32,
        inception: DateTime<Utc>,
        expiration: DateTime<Utc>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE ticket_category SET inception = $2, expiration = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(inception)
        .bind(expiration)
        .execute(&self.pool)
        .await
        .map_err(log_db_error("fix ticket category dates"))?;

        Ok(result.rows_affected())
    }

    /// Seats reserved by bounded categories of the event
    pub async fn get_ticket_allocation(&self, event_id: i32) -> Result<i64> {
        Ok(ticket_allocation(
            &self.find_all_ticket_categories(event_id).await?,
        ))
    }

    #[allow(dead_code)]
    pub async fn find_statistic_with_id(
        &self,
        category_id: i32,
        event_id: i32,
    ) -> Result<TicketCategoryStatisticView> {
        sqlx::query_as::<_, TicketCategoryStatisticView>(
            r#"
            SELECT * FROM ticket_category_statistics
            WHERE ticket_category_id = $1 AND event_id = $2
            "#,
        )
        .bind(category_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error("get ticket category statistic"))?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Statistics for ticket category {} not found in event {}",
                category_id, event_id
            ))
        })
    }

    pub async fn find_statistics_for_event_id(
        &self,
        event_id: i32,
    ) -> Result<Vec<TicketCategoryStatisticView>> {
        sqlx::query_as::<_, TicketCategoryStatisticView>(
            "SELECT * FROM ticket_category_statistics WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(log_db_error("list ticket category statistics"))
    }

    #[allow(dead_code)]
    pub async fn find_statistics_for_event_id_by_category_id(
        &self,
        event_id: i32,
    ) -> Result<HashMap<i32, TicketCategoryStatisticView>> {
        Ok(statistics_by_category_id(
            self.find_statistics_for_event_id(event_id).await?,
        ))
    }

    #[allow(dead_code)]
    pub async fn is_access_restricted(&self, id: i32) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT access_restricted FROM ticket_category WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_db_error("check ticket category restriction"))?
            .ok_or_else(|| AppError::NotFound(format!("Ticket category {} not found", id)))
    }

    /// Retire the category unless tickets in PENDING, ACQUIRED or CHECKED_IN
    /// still reference it. Check and flip happen in the same statement;
    /// returns the number of rows changed (0 or 1).
    pub async fn delete_category_if_empty(&self, category_id: i32) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE ticket_category SET tc_status = 'NOT_ACTIVE'
            FROM (
                SELECT COUNT(*) cnt FROM ticket
                WHERE category_id = $1 AND status IN ('PENDING', 'ACQUIRED', 'CHECKED_IN')
            ) tkts
            WHERE id = $1 AND tkts.cnt = 0
            "#,
        )
        .bind(category_id)
        .execute(&self.pool)
        .await
        .map_err(log_db_error("delete ticket category"))?;

        Ok(result.rows_affected())
    }

    /// Apply [`UPDATE_ORDINAL`] for each `(category_id, ordinal)` pair in one
    /// transaction. Pairs that do not belong to the event are skipped.
    pub async fn update_ordinals(&self, event_id: i32, ordinals: &[(i32, i32)]) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(log_db_error("begin ordinal update"))?;

        let mut affected = 0;
        for (category_id, ordinal) in ordinals {
            affected += sqlx::query(UPDATE_ORDINAL)
                .bind(ordinal)
                .bind(category_id)
                .bind(event_id)
                .execute(&mut *tx)
                .await
                .map_err(log_db_error("update ticket category ordinal"))?
                .rows_affected();
        }

        tx.commit()
            .await
            .map_err(log_db_error("commit ordinal update"))?;

        Ok(affected)
    }

    #[allow(dead_code)]
    pub async fn get_check_in_strategy(&self, id: i32) -> Result<TicketCheckInStrategy> {
        sqlx::query_scalar::<_, TicketCheckInStrategy>(
            "SELECT ticket_checkin_strategy FROM ticket_category WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error("get ticket category check-in strategy"))?
        .ok_or_else(|| AppError::NotFound(format!("Ticket category {} not found", id)))
    }

    pub async fn count_paid_categories_in_reservation(&self, category_ids: &[i32]) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ticket_category WHERE id = ANY($1) AND src_price_cts > 0",
        )
        .bind(category_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("count paid ticket categories"))
    }

    pub async fn find_categories_in_reservation(
        &self,
        reservation_id: &str,
    ) -> Result<Vec<TicketCategory>> {
        sqlx::query_as::<_, TicketCategory>(
            r#"
            SELECT DISTINCT tc.* FROM ticket_category_with_currency tc
            JOIN ticket t ON t.category_id = tc.id
            WHERE t.tickets_reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(log_db_error("list ticket categories in reservation"))
    }

    pub async fn get_metadata(&self, event_id: i32, category_id: i32) -> Result<CategoryMetadata> {
        let metadata = sqlx::query_scalar::<_, Option<Json<CategoryMetadata>>>(
            "SELECT metadata FROM ticket_category WHERE id = $1 AND event_id = $2",
        )
        .bind(category_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_db_error("get ticket category metadata"))?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Ticket category {} not found in event {}",
                category_id, event_id
            ))
        })?;

        Ok(metadata.map(|m| m.0).unwrap_or_default())
    }

    pub async fn update_metadata(
        &self,
        metadata: &CategoryMetadata,
        event_id: i32,
        category_id: i32,
    ) -> Result<u64> {
        write_metadata(&self.pool, metadata, event_id, category_id).await
    }

    /// Applies to every category of the event, active or not
    pub async fn update_ticket_access_type_for_event(
        &self,
        event_id: i32,
        access_type: TicketAccessType,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE ticket_category SET ticket_access_type = $2::ticket_access_type
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .bind(access_type)
        .execute(&self.pool)
        .await
        .map_err(log_db_error("update ticket access type"))?;

        Ok(result.rows_affected())
    }

    #[allow(dead_code)]
    pub async fn count_active_by_event_id(&self, event_id: i32) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ticket_category WHERE event_id = $1 AND tc_status = 'ACTIVE'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("count active ticket categories"))
    }

    /// Counts matching categories in any status
    #[allow(dead_code)]
    pub async fn count_category_for_event(
        &self,
        category_ids: &[i32],
        event_id: i32,
    ) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ticket_category WHERE event_id = $1 AND id = ANY($2)",
        )
        .bind(event_id)
        .bind(category_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(log_db_error("count ticket categories for event"))
    }
}

async fn write_fields<'e, E>(executor: E, id: i32, data: &TicketCategoryData) -> Result<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE ticket_category
        SET name = $2, inception = $3, expiration = $4, max_tickets = $5, src_price_cts = $6,
            access_restricted = $7, category_code = $8, valid_checkin_from = $9,
            valid_checkin_to = $10, ticket_validity_start = $11, ticket_validity_end = $12,
            ticket_checkin_strategy = $13, ticket_access_type = $14::ticket_access_type
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.inception)
    .bind(data.expiration)
    .bind(data.max_tickets)
    .bind(data.price_cts)
    .bind(data.access_restricted)
    .bind(data.code.as_deref())
    .bind(data.valid_checkin_from)
    .bind(data.valid_checkin_to)
    .bind(data.ticket_validity_start)
    .bind(data.ticket_validity_end)
    .bind(data.ticket_checkin_strategy)
    .bind(data.ticket_access_type)
    .execute(executor)
    .await
    .map_err(log_db_error("update ticket category"))?;

    Ok(result.rows_affected())
}

async fn write_bounded_flag<'e, E>(executor: E, id: i32, bounded: bool) -> Result<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("UPDATE ticket_category SET bounded = $2 WHERE id = $1")
        .bind(id)
        .bind(bounded)
        .execute(executor)
        .await
        .map_err(log_db_error("update ticket category bounded flag"))?;

    Ok(result.rows_affected())
}

async fn write_metadata<'e, E>(
    executor: E,
    metadata: &CategoryMetadata,
    event_id: i32,
    category_id: i32,
) -> Result<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE ticket_category SET metadata = $1::jsonb WHERE id = $2 AND event_id = $3",
    )
    .bind(Json(metadata))
    .bind(category_id)
    .bind(event_id)
    .execute(executor)
    .await
    .map_err(log_db_error("update ticket category metadata"))?;

    Ok(result.rows_affected())
}

pub fn index_by_id(categories: Vec<TicketCategory>) -> HashMap<i32, TicketCategory> {
    categories.into_iter().map(|c| (c.id, c)).collect()
}

/// Rows without metadata are left out of the map
pub fn metadata_by_category_id(rows: Vec<EntityIdAndMetadata>) -> HashMap<i32, CategoryMetadata> {
    rows.into_iter()
        .filter_map(|row| row.metadata.map(|m| (row.id, m.0)))
        .collect()
}

pub fn statistics_by_category_id(
    rows: Vec<TicketCategoryStatisticView>,
) -> HashMap<i32, TicketCategoryStatisticView> {
    rows.into_iter().map(|s| (s.id, s)).collect()
}

/// Unbounded categories do not reserve seats and contribute nothing
pub fn ticket_allocation(categories: &[TicketCategory]) -> i64 {
    categories
        .iter()
        .filter(|c| c.is_bounded())
        .map(|c| i64::from(c.max_tickets))
        .sum()
}
