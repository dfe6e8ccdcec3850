//! Read-through cache of item roles for a single validation pass

use std::collections::HashMap;

use shared::{ItemRoleLookup, PrintItemType};

use crate::error::AppResult;
use crate::store::ItemStore;

/// Caches role lookups against the item store
///
/// Entries live as long as the cache, which is one validation pass; nothing is
/// written through it so there is nothing to invalidate.
pub struct ItemRoleCache<'a> {
    store: &'a dyn ItemStore,
    roles: HashMap<String, Option<PrintItemType>>,
}

impl<'a> ItemRoleCache<'a> {
    pub fn new(store: &'a dyn ItemStore) -> Self {
        Self {
            store,
            roles: HashMap::new(),
        }
    }

    /// Role of an item, loading it from the store on first access
    pub async fn get(&mut self, name: &str) -> AppResult<Option<PrintItemType>> {
        if let Some(role) = self.roles.get(name) {
            return Ok(*role);
        }

        let role = self.store.find_print_item_type(name).await?;
        self.roles.insert(name.to_string(), role);
        Ok(role)
    }

    /// Load the roles of every named item not cached yet
    pub async fn prefetch<'n>(&mut self, names: impl IntoIterator<Item = &'n str>) -> AppResult<()> {
        for name in names {
            self.get(name).await?;
        }
        Ok(())
    }
}

impl ItemRoleLookup for ItemRoleCache<'_> {
    fn print_item_type(&self, item_code: &str) -> Option<PrintItemType> {
        self.roles.get(item_code).copied().flatten()
    }
}
