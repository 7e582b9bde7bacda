use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireEventAdmin;
use crate::features::reservations::dtos::{
    ReservationConfirmationDto, ReservationConfirmationRequest,
};
use crate::features::reservations::services::ReservationService;
use crate::shared::types::ApiResponse;

/// Confirm a reservation once its payment has been settled
#[utoipa::path(
    post,
    path = "/api/admin/events/{event_id}/reservations/{reservation_id}/confirm",
    params(
        ("event_id" = i32, Path, description = "Event ID"),
        ("reservation_id" = String, Path, description = "Reservation ID")
    ),
    request_body = ReservationConfirmationRequest,
    responses(
        (status = 200, description = "Reservation confirmed", body = ApiResponse<ReservationConfirmationDto>),
        (status = 400, description = "Missing payment provider or unpaid confirmation of paid tickets"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is not awaiting confirmation")
    ),
    tag = "reservations",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn confirm_reservation(
    RequireEventAdmin(user): RequireEventAdmin,
    State(service): State<Arc<ReservationService>>,
    Path((event_id, reservation_id)): Path<(i32, String)>,
    AppJson(request): AppJson<ReservationConfirmationRequest>,
) -> Result<Json<ApiResponse<ReservationConfirmationDto>>> {
    if !request.is_valid() {
        return Err(AppError::Validation(
            "transaction.paymentProvider is required".to_string(),
        ));
    }

    tracing::info!(
        "User {} confirming reservation {} of event {}",
        user.sub,
        reservation_id,
        event_id
    );

    let confirmation = service.confirm(event_id, &reservation_id, request).await?;
    Ok(Json(ApiResponse::success(
        Some(confirmation),
        Some("Reservation confirmed".to_string()),
        None,
    )))
}
