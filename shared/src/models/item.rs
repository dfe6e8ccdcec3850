//! Item models for fabrics, print processes and printed designs

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stock unit every fabric and printed design is kept in
pub const METER: &str = "Meter";

/// Unit auto-provisioned on the conversion graph
pub const YARD: &str = "Yard";

/// Unit used for derived net weights
pub const GRAM: &str = "Gram";

/// Role of an item in the digital printing flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PrintItemType {
    /// Raw fabric kept in stock
    #[serde(rename = "Fabric")]
    Fabric,
    /// Printing service, never stocked
    #[serde(rename = "Print Process")]
    PrintProcess,
    /// Finished good made from a fabric and a process
    #[serde(rename = "Printed Design")]
    PrintedDesign,
}

impl PrintItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintItemType::Fabric => "Fabric",
            PrintItemType::PrintProcess => "Print Process",
            PrintItemType::PrintedDesign => "Printed Design",
        }
    }

    /// Fabrics and printed designs are physical goods measured by length
    pub fn is_physical_goods(&self) -> bool {
        matches!(self, PrintItemType::Fabric | PrintItemType::PrintedDesign)
    }
}

/// Label that names no item role
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown print item type: {0}")]
pub struct UnknownPrintItemType(pub String);

impl FromStr for PrintItemType {
    type Err = UnknownPrintItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fabric" => Ok(PrintItemType::Fabric),
            "Print Process" => Ok(PrintItemType::PrintProcess),
            "Printed Design" => Ok(PrintItemType::PrintedDesign),
            _ => Err(UnknownPrintItemType(s.to_string())),
        }
    }
}

impl std::fmt::Display for PrintItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical properties of a fabric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FabricProperties {
    pub fabric_material: Option<String>,
    pub fabric_type: Option<String>,
    /// Width in inches
    pub fabric_width: Option<Decimal>,
    /// Grams per square meter
    pub fabric_gsm: Option<Decimal>,
    pub fabric_construction: Option<String>,
}

/// Properties only a printed design carries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DesignProperties {
    pub design_name: Option<String>,
    pub design_width: Option<Decimal>,
    pub design_height: Option<Decimal>,
    pub design_uom: Option<String>,
    pub design_gap: Option<Decimal>,
    pub per_wastage: Option<Decimal>,
    pub design_notes: Option<String>,
}

/// One edge of an item's unit conversion graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UomConversion {
    pub from_uom: String,
    pub from_qty: Decimal,
    pub to_uom: String,
    pub to_qty: Decimal,
}

impl UomConversion {
    /// 1 Yard = 0.9144 Meter
    pub fn yard_to_meter() -> Self {
        Self {
            from_uom: YARD.to_string(),
            from_qty: Decimal::ONE,
            to_uom: METER.to_string(),
            to_qty: Decimal::new(9144, 4),
        }
    }

    pub fn involves(&self, uom: &str) -> bool {
        self.from_uom == uom || self.to_uom == uom
    }
}

/// An item record as saved through the item lifecycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Item {
    /// Item code
    pub name: String,
    pub item_name: Option<String>,
    pub item_group: Option<String>,
    #[serde(default)]
    pub print_item_type: Option<PrintItemType>,
    #[serde(default)]
    pub is_stock_item: bool,
    #[serde(default)]
    pub is_fixed_asset: bool,
    pub stock_uom: Option<String>,
    #[serde(flatten)]
    pub fabric: FabricProperties,
    #[serde(flatten)]
    pub design: DesignProperties,
    /// Fabric a printed design is printed on
    pub fabric_item: Option<String>,
    /// Print process a printed design goes through
    pub process_item: Option<String>,
    pub net_weight_per_unit: Option<Decimal>,
    pub gross_weight_per_unit: Option<Decimal>,
    pub weight_uom: Option<String>,
    #[serde(default)]
    pub uom_conversion_graph: Vec<UomConversion>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_role(&self, role: PrintItemType) -> bool {
        self.print_item_type == Some(role)
    }

    pub fn is_physical_goods(&self) -> bool {
        self.print_item_type
            .map(|role| role.is_physical_goods())
            .unwrap_or(false)
    }
}
