pub mod ticket_category_repository;

pub use ticket_category_repository::TicketCategoryRepository;
