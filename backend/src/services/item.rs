//! Item lifecycle service for digital printing items
//!
//! Runs the item rules at the two points of an item save. `before_validate`
//! derives weights and provisions the Yard conversion, `validate` checks the
//! item's role and reconciles its fabric and design fields. A save only reaches
//! the store when both passes succeed.

use std::sync::Arc;

use shared::{
    apply_item_field_overrides, check_item_basics, check_item_role,
    clear_foreign_design_properties, derive_net_weight, ensure_yard_conversion,
    override_item_dashboard, reconcile_fabric_properties, DashboardData, Item,
    ItemFieldOverrides, PrintItemType, TransactionSection, ValidationError,
};

use crate::config::ItemSettings;
use crate::error::{AppError, AppResult};
use crate::services::role_cache::ItemRoleCache;
use crate::store::ItemStore;

/// Item service for saving and reading items through the item rules
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    settings: ItemSettings,
}

impl ItemService {
    /// Create a new ItemService instance
    pub fn new(store: Arc<dyn ItemStore>, settings: ItemSettings) -> Self {
        Self { store, settings }
    }

    /// Empty item for the new-item form
    pub fn new_item(&self) -> Item {
        Item::default()
    }

    /// Get an item by code
    pub async fn get(&self, name: &str) -> AppResult<Item> {
        self.store
            .find_item(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {}", name)))
    }

    /// Validate and persist an item, returning it as saved
    pub async fn save(&self, item: Item) -> AppResult<Item> {
        let mut doc = item;

        if let Err(err) = self.run_lifecycle(&mut doc).await {
            tracing::warn!(item = %doc.name, "Item save rejected: {}", err);
            return Err(err);
        }

        self.store.save_item(&doc).await?;
        tracing::info!(
            item = %doc.name,
            print_item_type = doc.print_item_type.map(|r| r.as_str()).unwrap_or("-"),
            "Item saved"
        );

        Ok(doc)
    }

    async fn run_lifecycle(&self, doc: &mut Item) -> AppResult<()> {
        self.before_validate(doc)?;
        self.validate(doc).await
    }

    /// Derive net weight, then provision the Yard conversion
    pub fn before_validate(&self, doc: &mut Item) -> Result<(), ValidationError> {
        derive_net_weight(doc, self.settings.float_precision);
        if let Some(weight) = doc.net_weight_per_unit {
            tracing::debug!(item = %doc.name, %weight, "Net weight per unit");
        }

        ensure_yard_conversion(doc)
    }

    /// Basic item checks, role checks, then fabric and design reconciliation
    pub async fn validate(&self, doc: &mut Item) -> AppResult<()> {
        check_item_basics(doc)?;

        let mut roles = ItemRoleCache::new(self.store.as_ref());
        if doc.is_role(PrintItemType::PrintedDesign) {
            let refs = [doc.fabric_item.as_deref(), doc.process_item.as_deref()];
            roles.prefetch(refs.into_iter().flatten()).await?;
        }
        check_item_role(doc, &roles)?;

        let linked_fabric = match (doc.print_item_type, doc.fabric_item.as_deref()) {
            (Some(PrintItemType::PrintedDesign), Some(fabric_item)) => self
                .store
                .find_item(fabric_item)
                .await?
                .map(|fabric| fabric.fabric),
            _ => None,
        };
        reconcile_fabric_properties(doc, linked_fabric.as_ref())?;
        clear_foreign_design_properties(doc);

        Ok(())
    }

    /// Item fields the host copies onto new items
    pub fn override_fields(&self) -> ItemFieldOverrides {
        let mut fields: ItemFieldOverrides = [
            ("item_name", "Data"),
            ("item_group", "Link"),
            ("stock_uom", "Link"),
            ("is_stock_item", "Check"),
        ]
        .into_iter()
        .map(|(field, fieldtype)| (field.to_string(), fieldtype.to_string()))
        .collect();

        apply_item_field_overrides(&mut fields);
        fields
    }

    /// Item dashboard with the Print Order link
    pub fn dashboard(&self) -> AppResult<DashboardData> {
        Ok(override_item_dashboard(default_item_dashboard())?)
    }
}

/// Dashboard layout the host renders for items
pub fn default_item_dashboard() -> DashboardData {
    let section = |label: &str, items: &[&str]| TransactionSection {
        label: label.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    };

    DashboardData {
        fieldname: "item_code".to_string(),
        transactions: vec![
            section("Groups", &["BOM", "Product Bundle", "Item Alternative"]),
            section("Pricing", &["Item Price", "Pricing Rule"]),
            section("Sell", &["Quotation", "Sales Order", "Delivery Note", "Sales Invoice"]),
            section("Buy", &["Material Request", "Purchase Order", "Purchase Receipt"]),
            section("Manufacture", &["Production Plan", "Work Order", "Item Manufacturer"]),
            section("Traceability", &["Serial No", "Batch"]),
            section("Stock Movement", &["Stock Entry", "Stock Reconciliation"]),
        ],
    }
}
