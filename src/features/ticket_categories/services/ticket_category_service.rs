use crate::core::error::{AppError, Result};
use crate::features::ticket_categories::dtos::{
    TicketAllocationDto, TicketCategoryRequestDto, TicketCategoryResponseDto, UpdateOrdinalsDto,
};
use crate::features::ticket_categories::models::{
    CategoryMetadata, TicketAccessType, TicketCategoryChanges, TicketCategoryData,
    TicketCategoryStatisticView,
};
use crate::features::ticket_categories::repositories::TicketCategoryRepository;

/// Service for ticket category administration
pub struct TicketCategoryService {
    repository: TicketCategoryRepository,
}

impl TicketCategoryService {
    pub fn new(repository: TicketCategoryRepository) -> Self {
        Self { repository }
    }

    async fn ensure_exists(&self, event_id: i32, category_id: i32) -> Result<()> {
        if !self
            .repository
            .check_category_exists_for_event(category_id, event_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "Ticket category {} not found in event {}",
                category_id, event_id
            )));
        }
        Ok(())
    }

    /// Reject a code already used by another active category of the event
    async fn ensure_code_available(
        &self,
        event_id: i32,
        code: Option<&str>,
        category_id: Option<i32>,
    ) -> Result<()> {
        let Some(code) = code else {
            return Ok(());
        };

        match self.repository.find_code_in_event(event_id, code).await? {
            Some(existing) if Some(existing.id) != category_id => Err(AppError::Conflict(format!(
                "Code '{}' is already used by ticket category {}",
                code, existing.id
            ))),
            _ => Ok(()),
        }
    }

    /// List active categories of an event in display order
    pub async fn list(&self, event_id: i32) -> Result<Vec<TicketCategoryResponseDto>> {
        let categories = self.repository.find_all_ticket_categories(event_id).await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    pub async fn get(&self, event_id: i32, category_id: i32) -> Result<TicketCategoryResponseDto> {
        let category = self
            .repository
            .get_by_id_and_active(category_id, event_id)
            .await?;
        Ok(category.into())
    }

    pub async fn create(
        &self,
        event_id: i32,
        dto: TicketCategoryRequestDto,
    ) -> Result<TicketCategoryResponseDto> {
        self.ensure_code_available(event_id, dto.code.as_deref(), None)
            .await?;

        let data = TicketCategoryData::from(dto);
        let id = self.repository.insert(event_id, &data).await?;

        tracing::info!(
            "Ticket category {} ('{}') created in event {}",
            id,
            data.name,
            event_id
        );

        self.get(event_id, id).await
    }

    pub async fn update(
        &self,
        event_id: i32,
        category_id: i32,
        dto: TicketCategoryRequestDto,
    ) -> Result<TicketCategoryResponseDto> {
        let current = self
            .repository
            .get_by_id_and_active(category_id, event_id)
            .await?;
        self.ensure_code_available(event_id, dto.code.as_deref(), Some(category_id))
            .await?;

        let changes = TicketCategoryChanges {
            bounded: Some(dto.bounded).filter(|b| *b != current.bounded),
            ordinal: dto.ordinal.filter(|o| *o != current.ordinal),
            metadata: dto.metadata.clone(),
        };
        let data = TicketCategoryData::from(dto);
        self.repository
            .update_with_changes(category_id, event_id, &data, &changes)
            .await?;

        tracing::info!(
            "Ticket category {} updated in event {}",
            category_id,
            event_id
        );

        self.get(event_id, category_id).await
    }

    /// Change the capacity of a category. A bounded category cannot shrink
    /// below the tickets already held by buyers.
    pub async fn update_availability(
        &self,
        event_id: i32,
        category_id: i32,
        max_tickets: i32,
    ) -> Result<TicketCategoryResponseDto> {
        self.ensure_exists(event_id, category_id).await?;

        let affected = self
            .repository
            .update_seats_availability(category_id, max_tickets)
            .await?;
        if affected == 0 {
            return Err(AppError::Conflict(format!(
                "Cannot reduce capacity of ticket category {} to {}: tickets are already taken",
                category_id, max_tickets
            )));
        }

        self.get(event_id, category_id).await
    }

    /// Soft delete; refused while tickets are pending, acquired or checked in
    pub async fn delete(&self, event_id: i32, category_id: i32) -> Result<()> {
        self.ensure_exists(event_id, category_id).await?;

        let affected = self
            .repository
            .delete_category_if_empty(category_id)
            .await?;
        if affected == 0 {
            return Err(AppError::Conflict(format!(
                "Ticket category {} still has active tickets",
                category_id
            )));
        }

        tracing::info!(
            "Ticket category {} deactivated in event {}",
            category_id,
            event_id
        );
        Ok(())
    }

    pub async fn get_metadata(&self, event_id: i32, category_id: i32) -> Result<CategoryMetadata> {
        self.ensure_exists(event_id, category_id).await?;
        self.repository.get_metadata(event_id, category_id).await
    }

    pub async fn update_metadata(
        &self,
        event_id: i32,
        category_id: i32,
        metadata: CategoryMetadata,
    ) -> Result<CategoryMetadata> {
        self.ensure_exists(event_id, category_id).await?;
        self.repository
            .update_metadata(&metadata, event_id, category_id)
            .await?;
        Ok(metadata)
    }

    /// Re-order categories; every id must belong to the event
    pub async fn update_ordinals(
        &self,
        event_id: i32,
        dto: UpdateOrdinalsDto,
    ) -> Result<Vec<TicketCategoryResponseDto>> {
        let mut ids: Vec<i32> = dto.ordinals.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != dto.ordinals.len() {
            return Err(AppError::Validation(
                "Each ticket category may appear only once".to_string(),
            ));
        }

        let found = self
            .repository
            .count_categories_belonging_to_event(event_id, &ids)
            .await?;
        if found != ids.len() as i64 {
            return Err(AppError::BadRequest(format!(
                "Only {} of {} ticket categories belong to event {}",
                found,
                ids.len(),
                event_id
            )));
        }

        let pairs: Vec<(i32, i32)> = dto.ordinals.iter().map(|o| (o.id, o.ordinal)).collect();
        self.repository.update_ordinals(event_id, &pairs).await?;

        self.list(event_id).await
    }

    pub async fn update_access_type(
        &self,
        event_id: i32,
        access_type: TicketAccessType,
    ) -> Result<u64> {
        let affected = self
            .repository
            .update_ticket_access_type_for_event(event_id, access_type)
            .await?;

        tracing::info!(
            "Ticket access type set to {} on {} categories of event {}",
            access_type,
            affected,
            event_id
        );
        Ok(affected)
    }

    pub async fn statistics(&self, event_id: i32) -> Result<Vec<TicketCategoryStatisticView>> {
        let mut statistics = self
            .repository
            .find_statistics_for_event_id(event_id)
            .await?;
        statistics.sort_by_key(|s| s.id);
        Ok(statistics)
    }

    pub async fn first_available(&self, event_id: i32) -> Result<TicketCategoryResponseDto> {
        self.repository
            .find_first_with_available_tickets(event_id)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No ticket category with available tickets in event {}",
                    event_id
                ))
            })
    }

    pub async fn allocation(&self, event_id: i32) -> Result<TicketAllocationDto> {
        let allocation = self.repository.get_ticket_allocation(event_id).await?;
        Ok(TicketAllocationDto {
            event_id,
            allocation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::PgPool;

    async fn create_event(pool: &PgPool) -> i32 {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO event(short_name, display_name, currency)
            VALUES ('service', 'Service', 'EUR') RETURNING id
            "#,
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn request(extra: serde_json::Value) -> TicketCategoryRequestDto {
        let mut body = json!({
            "name": "Regular",
            "inception": "2026-01-01T09:00:00Z",
            "expiration": "2027-03-01T09:00:00Z",
            "maxTickets": 10,
            "priceCts": 2500
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(body).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_applies_bounded_ordinal_and_metadata(pool: PgPool) {
        let event_id = create_event(&pool).await;
        let service = TicketCategoryService::new(TicketCategoryRepository::new(pool));
        let created = service.create(event_id, request(json!({}))).await.unwrap();
        assert!(created.bounded);
        assert_eq!(created.ordinal, 0);

        let body = request(json!({
            "name": "Renamed",
            "bounded": false,
            "ordinal": 7,
            "metadata": { "requirementsDescriptions": { "en": "Bring your ID" } }
        }));
        let updated = service.update(event_id, created.id, body).await.unwrap();

        assert_eq!(updated.name, "Renamed");
        assert!(!updated.bounded);
        assert_eq!(updated.ordinal, 7);
        assert_eq!(
            updated.metadata.requirements_descriptions.get("en"),
            Some(&"Bring your ID".to_string())
        );

        let unchanged = service
            .update(event_id, created.id, request(json!({})))
            .await
            .unwrap();
        assert!(unchanged.bounded);
        assert_eq!(unchanged.ordinal, 7);
        assert_eq!(unchanged.metadata, updated.metadata);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_capacity_cannot_drop_below_held_tickets(pool: PgPool) {
        let event_id = create_event(&pool).await;
        let service = TicketCategoryService::new(TicketCategoryRepository::new(pool.clone()));
        let created = service.create(event_id, request(json!({}))).await.unwrap();
        for status in ["ACQUIRED", "PENDING"] {
            sqlx::query("INSERT INTO ticket(event_id, category_id, status) VALUES ($1, $2, $3)")
                .bind(event_id)
                .bind(created.id)
                .bind(status)
                .execute(&pool)
                .await
                .unwrap();
        }

        let refused = service.update_availability(event_id, created.id, 1).await;
        assert!(matches!(refused, Err(AppError::Conflict(_))));

        let updated = service
            .update_availability(event_id, created.id, 2)
            .await
            .unwrap();
        assert_eq!(updated.max_tickets, 2);

        let unknown_id = created.id + 1;
        let missing = service.update_availability(event_id, unknown_id, 5).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
