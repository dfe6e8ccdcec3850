//! Document store for item records
//!
//! Item persistence sits behind [`ItemStore`] so the lifecycle rules can run
//! against Postgres in the server and against memory in tests.

use async_trait::async_trait;
use shared::{Item, PrintItemType};

use crate::error::AppResult;

mod memory;
mod postgres;

pub use memory::InMemoryItemStore;
pub use postgres::PgItemStore;

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Load an item with its conversion graph
    async fn find_item(&self, name: &str) -> AppResult<Option<Item>>;

    /// Role of an item without loading the full record
    async fn find_print_item_type(&self, name: &str) -> AppResult<Option<PrintItemType>>;

    /// Insert or replace an item and its conversion graph
    async fn save_item(&self, item: &Item) -> AppResult<()>;

    /// Check the store is reachable
    async fn ping(&self) -> AppResult<()>;
}
