//! Adapters that extend host-owned item metadata

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transactions section the Print Order link is added to
pub const MANUFACTURE_SECTION: &str = "Manufacture";

/// Document linked from the item dashboard
pub const PRINT_ORDER: &str = "Print Order";

/// Item fields copied by the host, keyed by field name with their field type
pub type ItemFieldOverrides = BTreeMap<String, String>;

/// Add the print item role to the fields the host copies onto new items
pub fn apply_item_field_overrides(fields: &mut ItemFieldOverrides) {
    fields.insert("print_item_type".to_string(), "Data".to_string());
}

/// A group of linked documents shown on a dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionSection {
    pub label: String,
    pub items: Vec<String>,
}

/// Dashboard layout supplied by the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardData {
    pub fieldname: String,
    pub transactions: Vec<TransactionSection>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Dashboard has no '{0}' section")]
    MissingSection(String),
}

/// Put the Print Order link first in the Manufacture section
pub fn override_item_dashboard(mut data: DashboardData) -> Result<DashboardData, DashboardError> {
    let section = data
        .transactions
        .iter_mut()
        .find(|d| d.label == MANUFACTURE_SECTION)
        .ok_or_else(|| DashboardError::MissingSection(MANUFACTURE_SECTION.to_string()))?;

    section.items.insert(0, PRINT_ORDER.to_string());
    Ok(data)
}
