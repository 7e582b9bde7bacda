pub mod auth;
pub mod reservations;
pub mod ticket_categories;
