pub mod metadata;
pub mod statistic;
pub mod ticket_category;

pub use metadata::CategoryMetadata;
pub use statistic::TicketCategoryStatisticView;
pub use ticket_category::{
    EntityIdAndMetadata, TicketAccessType, TicketCategory, TicketCategoryChanges,
    TicketCategoryData, TicketCategoryStatus, TicketCheckInStrategy,
};
