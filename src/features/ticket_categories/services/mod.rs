pub mod ticket_category_service;

pub use ticket_category_service::TicketCategoryService;
