use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireEventAdmin;
use crate::features::ticket_categories::dtos::{
    TicketAllocationDto, TicketCategoryRequestDto, TicketCategoryResponseDto,
    UpdateAccessTypeDto, UpdateAvailabilityDto, UpdateOrdinalsDto,
};
use crate::features::ticket_categories::models::{CategoryMetadata, TicketCategoryStatisticView};
use crate::features::ticket_categories::services::TicketCategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// List the active ticket categories of an event
#[utoipa::path(
    get,
    path = "/api/admin/events/{event_id}/categories",
    params(
        ("event_id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Ticket categories in display order", body = ApiResponse<Vec<TicketCategoryResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - event admin access required")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_categories(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path(event_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<TicketCategoryResponseDto>>>> {
    let categories = service.list(event_id).await?;
    let total = categories.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(categories),
        None,
        Some(Meta { total }),
    )))
}

/// Create a ticket category
#[utoipa::path(
    post,
    path = "/api/admin/events/{event_id}/categories",
    params(
        ("event_id" = i32, Path, description = "Event ID")
    ),
    request_body = TicketCategoryRequestDto,
    responses(
        (status = 201, description = "Ticket category created", body = ApiResponse<TicketCategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Category code already in use")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    RequireEventAdmin(user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path(event_id): Path<i32>,
    AppJson(dto): AppJson<TicketCategoryRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<TicketCategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(event_id, dto).await?;
    tracing::info!(
        "Ticket category {} created by {}",
        category.id,
        user.account_id
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Get an active ticket category
#[utoipa::path(
    get,
    path = "/api/admin/events/{event_id}/categories/{category_id}",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("category_id" = i32, Path, description = "Ticket category ID")
    ),
    responses(
        (status = 200, description = "Ticket category found", body = ApiResponse<TicketCategoryResponseDto>),
        (status = 404, description = "Ticket category not found")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_category(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path((event_id, category_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<TicketCategoryResponseDto>>> {
    let category = service.get(event_id, category_id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Update every editable field of a ticket category
#[utoipa::path(
    put,
    path = "/api/admin/events/{event_id}/categories/{category_id}",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("category_id" = i32, Path, description = "Ticket category ID")
    ),
    request_body = TicketCategoryRequestDto,
    responses(
        (status = 200, description = "Ticket category updated", body = ApiResponse<TicketCategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Ticket category not found"),
        (status = 409, description = "Category code already in use")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_category(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path((event_id, category_id)): Path<(i32, i32)>,
    AppJson(dto): AppJson<TicketCategoryRequestDto>,
) -> Result<Json<ApiResponse<TicketCategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.update(event_id, category_id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Deactivate a ticket category that holds no live tickets
#[utoipa::path(
    delete,
    path = "/api/admin/events/{event_id}/categories/{category_id}",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("category_id" = i32, Path, description = "Ticket category ID")
    ),
    responses(
        (status = 200, description = "Ticket category deactivated"),
        (status = 404, description = "Ticket category not found"),
        (status = 409, description = "Tickets are pending, acquired or checked in")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    RequireEventAdmin(user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path((event_id, category_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(event_id, category_id).await?;
    tracing::info!(
        "Ticket category {} deleted by {}",
        category_id,
        user.account_id
    );

    Ok(Json(ApiResponse::success(
        None,
        Some("Ticket category deactivated".to_string()),
        None,
    )))
}

/// Change the capacity of a ticket category
#[utoipa::path(
    put,
    path = "/api/admin/events/{event_id}/categories/{category_id}/availability",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("category_id" = i32, Path, description = "Ticket category ID")
    ),
    request_body = UpdateAvailabilityDto,
    responses(
        (status = 200, description = "Capacity updated", body = ApiResponse<TicketCategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Ticket category not found"),
        (status = 409, description = "Capacity below tickets already taken")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_availability(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path((event_id, category_id)): Path<(i32, i32)>,
    AppJson(dto): AppJson<UpdateAvailabilityDto>,
) -> Result<Json<ApiResponse<TicketCategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service
        .update_availability(event_id, category_id, dto.max_tickets)
        .await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Get the metadata of a ticket category
#[utoipa::path(
    get,
    path = "/api/admin/events/{event_id}/categories/{category_id}/metadata",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("category_id" = i32, Path, description = "Ticket category ID")
    ),
    responses(
        (status = 200, description = "Category metadata", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Ticket category not found")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_metadata(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path((event_id, category_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<CategoryMetadata>>> {
    let metadata = service.get_metadata(event_id, category_id).await?;
    Ok(Json(ApiResponse::success(Some(metadata), None, None)))
}

/// Replace the metadata of a ticket category
#[utoipa::path(
    put,
    path = "/api/admin/events/{event_id}/categories/{category_id}/metadata",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("category_id" = i32, Path, description = "Ticket category ID")
    ),
    request_body(content = serde_json::Value, description = "Category metadata"),
    responses(
        (status = 200, description = "Metadata replaced", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Ticket category not found")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_metadata(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path((event_id, category_id)): Path<(i32, i32)>,
    AppJson(metadata): AppJson<CategoryMetadata>,
) -> Result<Json<ApiResponse<CategoryMetadata>>> {
    let metadata = service
        .update_metadata(event_id, category_id, metadata)
        .await?;
    Ok(Json(ApiResponse::success(Some(metadata), None, None)))
}

/// Re-order the ticket categories of an event
#[utoipa::path(
    put,
    path = "/api/admin/events/{event_id}/categories/ordinals",
    params(
        ("event_id" = i32, Path, description = "Event ID")
    ),
    request_body = UpdateOrdinalsDto,
    responses(
        (status = 200, description = "Categories in their new order", body = ApiResponse<Vec<TicketCategoryResponseDto>>),
        (status = 400, description = "Unknown or duplicated category")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_ordinals(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path(event_id): Path<i32>,
    AppJson(dto): AppJson<UpdateOrdinalsDto>,
) -> Result<Json<ApiResponse<Vec<TicketCategoryResponseDto>>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let categories = service.update_ordinals(event_id, dto).await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}

/// Set the access type of every category of an event
#[utoipa::path(
    put,
    path = "/api/admin/events/{event_id}/categories/access-type",
    params(
        ("event_id" = i32, Path, description = "Event ID")
    ),
    request_body = UpdateAccessTypeDto,
    responses(
        (status = 200, description = "Access type updated")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_access_type(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path(event_id): Path<i32>,
    AppJson(dto): AppJson<UpdateAccessTypeDto>,
) -> Result<Json<ApiResponse<()>>> {
    let affected = service
        .update_access_type(event_id, dto.ticket_access_type)
        .await?;

    Ok(Json(ApiResponse::success(
        None,
        Some(format!("{} ticket categories updated", affected)),
        None,
    )))
}

/// Sales statistics of every active category of an event
#[utoipa::path(
    get,
    path = "/api/admin/events/{event_id}/categories/statistics",
    params(
        ("event_id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Per-category statistics", body = ApiResponse<Vec<TicketCategoryStatisticView>>)
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_statistics(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path(event_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<TicketCategoryStatisticView>>>> {
    let statistics = service.statistics(event_id).await?;
    Ok(Json(ApiResponse::success(Some(statistics), None, None)))
}

/// First public category that can still sell a ticket
#[utoipa::path(
    get,
    path = "/api/admin/events/{event_id}/categories/first-available",
    params(
        ("event_id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Ticket category found", body = ApiResponse<TicketCategoryResponseDto>),
        (status = 404, description = "No category has tickets available")
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_first_available(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path(event_id): Path<i32>,
) -> Result<Json<ApiResponse<TicketCategoryResponseDto>>> {
    let category = service.first_available(event_id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Seats allocated to the bounded categories of an event
#[utoipa::path(
    get,
    path = "/api/admin/events/{event_id}/allocation",
    params(
        ("event_id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Ticket allocation", body = ApiResponse<TicketAllocationDto>)
    ),
    tag = "ticket-categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_allocation(
    RequireEventAdmin(_user): RequireEventAdmin,
    State(service): State<Arc<TicketCategoryService>>,
    Path(event_id): Path<i32>,
) -> Result<Json<ApiResponse<TicketAllocationDto>>> {
    let allocation = service.allocation(event_id).await?;
    Ok(Json(ApiResponse::success(Some(allocation), None, None)))
}
