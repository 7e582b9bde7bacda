use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::reservations::{
    dtos as reservations_dtos, handlers as reservations_handlers,
    models as reservations_models,
};
use crate::features::ticket_categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
};
use crate::shared::types::Meta;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Ticket categories
        categories_handlers::list_categories,
        categories_handlers::create_category,
        categories_handlers::get_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        categories_handlers::update_availability,
        categories_handlers::get_metadata,
        categories_handlers::update_metadata,
        categories_handlers::update_ordinals,
        categories_handlers::update_access_type,
        categories_handlers::list_statistics,
        categories_handlers::get_first_available,
        categories_handlers::get_allocation,
        // Reservations
        reservations_handlers::confirm_reservation,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Ticket categories
            categories_dtos::TicketCategoryRequestDto,
            categories_dtos::TicketCategoryResponseDto,
            categories_dtos::UpdateAvailabilityDto,
            categories_dtos::CategoryOrdinalDto,
            categories_dtos::UpdateOrdinalsDto,
            categories_dtos::UpdateAccessTypeDto,
            categories_dtos::TicketAllocationDto,
            categories_models::TicketCategoryStatus,
            categories_models::TicketCheckInStrategy,
            categories_models::TicketAccessType,
            categories_models::TicketCategoryStatisticView,
            // Reservations
            reservations_dtos::ReservationConfirmationRequest,
            reservations_dtos::ReservationConfirmationDto,
            reservations_dtos::TransactionDetails,
            reservations_dtos::Notification,
            reservations_dtos::ReservationBillingData,
            reservations_models::PaymentProvider,
        )
    ),
    tags(
        (name = "ticket-categories", description = "Ticket category administration per event"),
        (name = "reservations", description = "Reservation confirmation after payment"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_admin_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/admin/events/{event_id}/categories"));
        assert!(paths.contains_key(
            "/api/admin/events/{event_id}/categories/{category_id}/metadata"
        ));
        assert!(paths.contains_key(
            "/api/admin/events/{event_id}/reservations/{reservation_id}/confirm"
        ));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Box Office".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Box Office");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
