//! WebAssembly module for digital printing items
//!
//! Provides client-side computation for:
//! - Net weight per meter from GSM and width
//! - Yard to Meter conversion
//! - Preparing an item form before it is submitted
//! - Offline role checks against known item roles

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

/// Precision used when the caller does not pass one
const DEFAULT_PRECISION: u32 = 3;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("digital printing module loaded"));
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Grams per meter of a fabric `width` inches wide weighing `gsm` grams per square meter
#[wasm_bindgen]
pub fn calculate_net_weight_per_unit(gsm: f64, width: f64, precision: Option<u32>) -> f64 {
    if gsm <= 0.0 {
        return 0.0;
    }
    let weight = net_weight_per_meter(
        to_decimal(gsm),
        to_decimal(width),
        precision.unwrap_or(DEFAULT_PRECISION),
    );
    to_f64(weight)
}

/// Length in meters of `yards` yards
#[wasm_bindgen]
pub fn yard_to_meter(yards: f64) -> f64 {
    to_f64(to_decimal(yards) * UomConversion::yard_to_meter().to_qty)
}

/// Item roles in display order
#[wasm_bindgen]
pub fn print_item_type_options() -> js_sys::Array {
    [
        PrintItemType::Fabric,
        PrintItemType::PrintProcess,
        PrintItemType::PrintedDesign,
    ]
    .iter()
    .map(|role| JsValue::from_str(role.as_str()))
    .collect()
}

/// Whether a role label names a role measured by length
#[wasm_bindgen]
pub fn is_physical_goods_role(label: &str) -> bool {
    label
        .parse::<PrintItemType>()
        .map(|role| role.is_physical_goods())
        .unwrap_or(false)
}

/// Derive weights and add the Yard conversion to an item form, returning it as JSON
#[wasm_bindgen]
pub fn prepare_item(item_json: &str, precision: Option<u32>) -> Result<String, JsValue> {
    let mut item: Item = serde_json::from_str(item_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid item JSON: {}", e)))?;

    derive_net_weight(&mut item, precision.unwrap_or(DEFAULT_PRECISION));
    ensure_yard_conversion(&mut item).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&item).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Check an item's role rules against a map of known item codes to role labels
///
/// Returns an empty string when the item passes, otherwise the first error message.
#[wasm_bindgen]
pub fn check_item_role_offline(item_json: &str, roles_json: &str) -> Result<String, JsValue> {
    let item: Item = serde_json::from_str(item_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid item JSON: {}", e)))?;
    let roles: HashMap<String, PrintItemType> = serde_json::from_str(roles_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid roles JSON: {}", e)))?;

    Ok(check_item_basics(&item)
        .and_then(|_| check_item_role(&item, &roles))
        .err()
        .map(|e| e.to_string())
        .unwrap_or_default())
}
