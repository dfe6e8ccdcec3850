//! Business logic services for the digital printing extension

pub mod item;
pub mod reporting;
pub mod role_cache;

pub use item::ItemService;
pub use reporting::{PgSummarySource, ReportingService, SummarySource};
pub use role_cache::ItemRoleCache;
