pub mod ticket_category_dto;

pub use ticket_category_dto::{
    CategoryOrdinalDto, TicketAllocationDto, TicketCategoryRequestDto, TicketCategoryResponseDto,
    UpdateAccessTypeDto, UpdateAvailabilityDto, UpdateOrdinalsDto,
};
