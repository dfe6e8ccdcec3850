//! Item rules for the digital printing flow
//!
//! Rules run in two passes on every item save. The pre-validation pass derives
//! net weight and provisions the Yard conversion. The validation pass checks the
//! item's role and reconciles fabric and design fields with it.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{
    DesignProperties, FabricProperties, Item, PrintItemType, UomConversion, GRAM, METER, YARD,
};

/// Inches to meters, applied to a GSM × width product
pub const INCH_TO_METER: Decimal = Decimal::from_parts(254, 0, 0, false, 4);

/// A rule violation that aborts the save or report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{message}")]
    MissingField {
        field: &'static str,
        message: String,
    },

    #[error("Item {item} is not a {expected} Item")]
    RoleMismatch {
        field: &'static str,
        item: String,
        expected: PrintItemType,
    },

    #[error("{message}")]
    RoleConstraint {
        field: &'static str,
        message: String,
    },

    #[error("Default Unit of Measure must be {expected}")]
    InvalidUom {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Date Range is incorrect: {from_date} is after {to_date}")]
    InvalidDateRange {
        from_date: NaiveDate,
        to_date: NaiveDate,
    },
}

impl ValidationError {
    /// Field the error is reported against
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field, .. }
            | ValidationError::RoleMismatch { field, .. }
            | ValidationError::RoleConstraint { field, .. }
            | ValidationError::InvalidUom { field, .. } => field,
            ValidationError::InvalidDateRange { .. } => "from_date",
        }
    }

    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "MISSING_FIELD",
            ValidationError::RoleMismatch { .. } => "ROLE_MISMATCH",
            ValidationError::RoleConstraint { .. } => "VALIDATION_ERROR",
            ValidationError::InvalidUom { .. } => "INVALID_UOM",
            ValidationError::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }

    fn missing(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field,
            message: message.into(),
        }
    }

    fn constraint(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::RoleConstraint {
            field,
            message: message.into(),
        }
    }
}

/// Read-only lookup of other items' roles
pub trait ItemRoleLookup {
    /// Role of the named item, `None` when unclassified or unknown
    fn print_item_type(&self, item_code: &str) -> Option<PrintItemType>;
}

impl ItemRoleLookup for HashMap<String, PrintItemType> {
    fn print_item_type(&self, item_code: &str) -> Option<PrintItemType> {
        self.get(item_code).copied()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

fn is_unset(value: &Option<Decimal>) -> bool {
    value.map(|v| v.is_zero()).unwrap_or(true)
}

// ============================================================================
// Pre-validation
// ============================================================================

/// Derive net weight per meter from GSM and width in inches
///
/// Only fabrics and printed designs with a positive GSM are touched. Gross
/// weight is reset to zero whenever net weight is derived.
pub fn derive_net_weight(item: &mut Item, precision: u32) {
    if !item.is_physical_goods() {
        return;
    }

    let gsm = item.fabric.fabric_gsm.unwrap_or_default();
    if gsm <= Decimal::ZERO {
        return;
    }

    let width = item.fabric.fabric_width.unwrap_or_default();
    let net_weight = net_weight_per_meter(gsm, width, precision);

    item.net_weight_per_unit = Some(net_weight);
    item.gross_weight_per_unit = Some(Decimal::ZERO);
    item.weight_uom = Some(GRAM.to_string());
}

/// Grams per meter of a fabric `width` inches wide weighing `gsm` grams per square meter
pub fn net_weight_per_meter(gsm: Decimal, width: Decimal, precision: u32) -> Decimal {
    (gsm * width * INCH_TO_METER)
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
}

/// Require Meter as stock unit and make sure a Yard conversion exists
pub fn ensure_yard_conversion(item: &mut Item) -> Result<(), ValidationError> {
    if !item.is_physical_goods() {
        return Ok(());
    }

    if item.stock_uom.as_deref() != Some(METER) {
        return Err(ValidationError::InvalidUom {
            field: "stock_uom",
            expected: METER,
        });
    }

    if !item.uom_conversion_graph.iter().any(|d| d.involves(YARD)) {
        item.uom_conversion_graph.push(UomConversion::yard_to_meter());
    }

    Ok(())
}

// ============================================================================
// Validation
// ============================================================================

/// Checks every item must pass regardless of its role
pub fn check_item_basics(item: &Item) -> Result<(), ValidationError> {
    if item.name.trim().is_empty() {
        return Err(ValidationError::missing("name", "Item Code is mandatory"));
    }
    if is_blank(&item.stock_uom) {
        return Err(ValidationError::missing(
            "stock_uom",
            "Default Unit of Measure is mandatory",
        ));
    }
    if item.is_fixed_asset && item.is_stock_item {
        return Err(ValidationError::constraint(
            "is_fixed_asset",
            "Fixed Asset Item must be a non-stock item",
        ));
    }
    for (idx, d) in item.uom_conversion_graph.iter().enumerate() {
        if d.from_qty <= Decimal::ZERO || d.to_qty <= Decimal::ZERO {
            return Err(ValidationError::constraint(
                "uom_conversion_graph",
                format!(
                    "Row #{}: conversion quantities must be greater than zero",
                    idx + 1
                ),
            ));
        }
    }
    Ok(())
}

/// Check the item against the rules of its print role
///
/// Checks run in a fixed order and the first failure is returned.
pub fn check_item_role(item: &Item, roles: &impl ItemRoleLookup) -> Result<(), ValidationError> {
    match item.print_item_type {
        Some(PrintItemType::Fabric) => {
            if !item.is_stock_item {
                return Err(ValidationError::constraint(
                    "is_stock_item",
                    "Fabric Item must be a Stock Item",
                ));
            }
            if is_unset(&item.fabric.fabric_width) {
                return Err(ValidationError::missing(
                    "fabric_width",
                    "Fabric Width is required for Fabric Item",
                ));
            }
            if is_blank(&item.fabric.fabric_material) {
                return Err(ValidationError::missing(
                    "fabric_material",
                    "Fabric Material is required for Fabric Item",
                ));
            }
        }

        Some(PrintItemType::PrintProcess) => {
            if item.is_stock_item {
                return Err(ValidationError::constraint(
                    "is_stock_item",
                    "Print Process Item cannot be a Stock Item",
                ));
            }
            if item.is_fixed_asset {
                return Err(ValidationError::constraint(
                    "is_fixed_asset",
                    "Print Process Item cannot be a Fixed Asset",
                ));
            }
        }

        Some(PrintItemType::PrintedDesign) => {
            if !item.is_stock_item {
                return Err(ValidationError::constraint(
                    "is_stock_item",
                    "Printed Design Item must be a Stock Item",
                ));
            }

            if is_blank(&item.design.design_name) {
                return Err(ValidationError::missing(
                    "design_name",
                    "Design Name is mandatory for Printed Design Item",
                ));
            }
            let fabric_item = match item.fabric_item.as_deref() {
                Some(name) if !name.trim().is_empty() => name,
                _ => {
                    return Err(ValidationError::missing(
                        "fabric_item",
                        "Fabric Item is mandatory for Printed Design Item",
                    ))
                }
            };
            let process_item = match item.process_item.as_deref() {
                Some(name) if !name.trim().is_empty() => name,
                _ => {
                    return Err(ValidationError::missing(
                        "process_item",
                        "Print Process Item is mandatory for Printed Design Item",
                    ))
                }
            };

            check_reference_role(roles, "fabric_item", fabric_item, PrintItemType::Fabric)?;
            check_reference_role(
                roles,
                "process_item",
                process_item,
                PrintItemType::PrintProcess,
            )?;
        }

        None => {}
    }

    Ok(())
}

fn check_reference_role(
    roles: &impl ItemRoleLookup,
    field: &'static str,
    item_code: &str,
    expected: PrintItemType,
) -> Result<(), ValidationError> {
    if roles.print_item_type(item_code) != Some(expected) {
        return Err(ValidationError::RoleMismatch {
            field,
            item: item_code.to_string(),
            expected,
        });
    }
    Ok(())
}

/// Reconcile fabric properties with the item's role
///
/// A fabric keeps the properties it was authored with. Any other item takes
/// them from its linked fabric, or has them cleared when there is none.
pub fn reconcile_fabric_properties(
    item: &mut Item,
    linked_fabric: Option<&FabricProperties>,
) -> Result<(), ValidationError> {
    if !item.is_role(PrintItemType::PrintedDesign) {
        item.fabric_item = None;
    }

    if item.is_role(PrintItemType::Fabric) {
        if is_unset(&item.fabric.fabric_width) {
            return Err(ValidationError::missing(
                "fabric_width",
                "Fabric Width is required for Fabric Item",
            ));
        }
        if is_blank(&item.fabric.fabric_material) {
            return Err(ValidationError::missing(
                "fabric_material",
                "Fabric Material is required for Fabric Item",
            ));
        }
        return Ok(());
    }

    item.fabric = match (&item.fabric_item, linked_fabric) {
        (Some(_), Some(fabric)) => fabric.clone(),
        _ => FabricProperties::default(),
    };

    Ok(())
}

/// Drop design fields and references from anything but a printed design
pub fn clear_foreign_design_properties(item: &mut Item) {
    if item.is_role(PrintItemType::PrintedDesign) {
        return;
    }

    item.design = DesignProperties::default();
    item.process_item = None;
    item.fabric_item = None;
}
