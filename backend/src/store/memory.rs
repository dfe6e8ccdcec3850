use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use shared::{Item, PrintItemType};

use super::ItemStore;
use crate::error::{AppError, AppResult};

/// Item store kept in process memory
#[derive(Default)]
pub struct InMemoryItemStore {
    items: RwLock<HashMap<String, Item>>,
    role_lookups: AtomicUsize,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given items, bypassing the item rules
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.items.write() {
            for item in items {
                map.insert(item.name.clone(), item);
            }
        }
        store
    }

    /// Number of role lookups served so far
    pub fn role_lookups(&self) -> usize {
        self.role_lookups.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> AppError {
    AppError::Internal("item store lock poisoned".to_string())
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn find_item(&self, name: &str) -> AppResult<Option<Item>> {
        let map = self.items.read().map_err(|_| poisoned())?;
        Ok(map.get(name).cloned())
    }

    async fn find_print_item_type(&self, name: &str) -> AppResult<Option<PrintItemType>> {
        self.role_lookups.fetch_add(1, Ordering::SeqCst);
        let map = self.items.read().map_err(|_| poisoned())?;
        Ok(map.get(name).and_then(|item| item.print_item_type))
    }

    async fn save_item(&self, item: &Item) -> AppResult<()> {
        let mut map = self.items.write().map_err(|_| poisoned())?;
        map.insert(item.name.clone(), item.clone());
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
