//! Fabric printing summary report models

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Date range the summary is computed over
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryFilter {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl SummaryFilter {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self { from_date, to_date }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.from_date > self.to_date {
            return Err(ValidationError::InvalidDateRange {
                from_date: self.from_date,
                to_date: self.to_date,
            });
        }
        Ok(())
    }
}

/// Orders received per fabric material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderAggregate {
    pub fabric_material: Option<String>,
    pub no_of_orders: i64,
    pub ordered_qty: Decimal,
}

/// A summed quantity per fabric material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialQuantity {
    pub fabric_material: Option<String>,
    pub qty: Decimal,
}

impl MaterialQuantity {
    pub fn new(fabric_material: Option<&str>, qty: Decimal) -> Self {
        Self {
            fabric_material: fabric_material.map(str::to_string),
            qty,
        }
    }
}

/// The five aggregate sets the summary is merged from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryDataSets {
    pub orders: Vec<OrderAggregate>,
    pub received: Vec<MaterialQuantity>,
    pub produced: Vec<MaterialQuantity>,
    pub packed: Vec<MaterialQuantity>,
    pub delivered: Vec<MaterialQuantity>,
}

/// One row of the fabric printing summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FabricPrintingSummaryRow {
    pub fabric_material: Option<String>,
    pub no_of_orders: i64,
    pub ordered_qty: Decimal,
    pub received_qty: Decimal,
    pub produced_qty: Decimal,
    pub packed_qty: Decimal,
    pub delivered_qty: Decimal,
}

impl FabricPrintingSummaryRow {
    pub fn empty(fabric_material: Option<String>) -> Self {
        Self {
            fabric_material,
            no_of_orders: 0,
            ordered_qty: Decimal::ZERO,
            received_qty: Decimal::ZERO,
            produced_qty: Decimal::ZERO,
            packed_qty: Decimal::ZERO,
            delivered_qty: Decimal::ZERO,
        }
    }
}

/// Column descriptor for tabular rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportColumn {
    pub label: String,
    pub fieldname: String,
    pub fieldtype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    pub width: u32,
}

impl ReportColumn {
    fn new(label: &str, fieldname: &str, fieldtype: &str, width: u32) -> Self {
        Self {
            label: label.to_string(),
            fieldname: fieldname.to_string(),
            fieldtype: fieldtype.to_string(),
            options: None,
            width,
        }
    }

    fn link(mut self, doctype: &str) -> Self {
        self.options = Some(doctype.to_string());
        self
    }
}

/// Columns and rows of the fabric printing summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricPrintingSummary {
    pub columns: Vec<ReportColumn>,
    pub data: Vec<FabricPrintingSummaryRow>,
}

/// Merge the five aggregate sets into one row per fabric material, sorted by material
pub fn merge_summary(sets: &SummaryDataSets) -> Vec<FabricPrintingSummaryRow> {
    let mut rows: BTreeMap<Option<String>, FabricPrintingSummaryRow> = BTreeMap::new();

    for d in &sets.orders {
        let row = row_for(&mut rows, &d.fabric_material);
        row.no_of_orders = d.no_of_orders;
        row.ordered_qty = d.ordered_qty;
    }
    for d in &sets.received {
        row_for(&mut rows, &d.fabric_material).received_qty = d.qty;
    }
    for d in &sets.produced {
        row_for(&mut rows, &d.fabric_material).produced_qty = d.qty;
    }
    for d in &sets.packed {
        row_for(&mut rows, &d.fabric_material).packed_qty = d.qty;
    }
    for d in &sets.delivered {
        row_for(&mut rows, &d.fabric_material).delivered_qty = d.qty;
    }

    rows.into_values().collect()
}

fn row_for<'a>(
    rows: &'a mut BTreeMap<Option<String>, FabricPrintingSummaryRow>,
    material: &Option<String>,
) -> &'a mut FabricPrintingSummaryRow {
    rows.entry(material.clone())
        .or_insert_with(|| FabricPrintingSummaryRow::empty(material.clone()))
}

/// Fixed column layout of the fabric printing summary
pub fn summary_columns() -> Vec<ReportColumn> {
    vec![
        ReportColumn::new("Fabric Material", "fabric_material", "Link", 120).link("Fabric Material"),
        ReportColumn::new("Orders Received", "no_of_orders", "Int", 110),
        ReportColumn::new("Ordered Qty", "ordered_qty", "Float", 120),
        ReportColumn::new("Fabric Received Qty", "received_qty", "Float", 125),
        ReportColumn::new("Produced Qty", "produced_qty", "Float", 120),
        ReportColumn::new("Packed Qty", "packed_qty", "Float", 120),
        ReportColumn::new("Delivered Qty", "delivered_qty", "Float", 120),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_rejects_reversed_range() {
        let filter = SummaryFilter::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(
            filter.validate(),
            Err(ValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_filter_accepts_single_day() {
        let filter = SummaryFilter::new(date(2024, 1, 1), date(2024, 1, 1));
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_merge_production_only_material() {
        let sets = SummaryDataSets {
            produced: vec![MaterialQuantity::new(Some("Silk"), Decimal::from(40))],
            ..Default::default()
        };

        let rows = merge_summary(&sets);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.fabric_material.as_deref(), Some("Silk"));
        assert_eq!(row.produced_qty, Decimal::from(40));
        assert_eq!(row.no_of_orders, 0);
        assert_eq!(row.ordered_qty, Decimal::ZERO);
        assert_eq!(row.received_qty, Decimal::ZERO);
        assert_eq!(row.packed_qty, Decimal::ZERO);
        assert_eq!(row.delivered_qty, Decimal::ZERO);
    }

    #[test]
    fn test_merge_combines_sets_and_sorts() {
        let sets = SummaryDataSets {
            orders: vec![
                OrderAggregate {
                    fabric_material: Some("Lawn".to_string()),
                    no_of_orders: 3,
                    ordered_qty: Decimal::from(1500),
                },
                OrderAggregate {
                    fabric_material: Some("Cotton".to_string()),
                    no_of_orders: 1,
                    ordered_qty: Decimal::from(200),
                },
            ],
            received: vec![MaterialQuantity::new(Some("Lawn"), Decimal::from(1600))],
            delivered: vec![MaterialQuantity::new(Some("Cotton"), Decimal::from(180))],
            ..Default::default()
        };

        let rows = merge_summary(&sets);
        let materials: Vec<_> = rows.iter().map(|r| r.fabric_material.as_deref()).collect();
        assert_eq!(materials, vec![Some("Cotton"), Some("Lawn")]);

        assert_eq!(rows[0].no_of_orders, 1);
        assert_eq!(rows[0].delivered_qty, Decimal::from(180));
        assert_eq!(rows[0].received_qty, Decimal::ZERO);

        assert_eq!(rows[1].no_of_orders, 3);
        assert_eq!(rows[1].ordered_qty, Decimal::from(1500));
        assert_eq!(rows[1].received_qty, Decimal::from(1600));
    }

    #[test]
    fn test_merge_unknown_material_sorts_first() {
        let sets = SummaryDataSets {
            packed: vec![
                MaterialQuantity::new(Some("Chiffon"), Decimal::from(5)),
                MaterialQuantity::new(None, Decimal::from(7)),
            ],
            ..Default::default()
        };

        let rows = merge_summary(&sets);
        assert_eq!(rows[0].fabric_material, None);
        assert_eq!(rows[0].packed_qty, Decimal::from(7));
        assert_eq!(rows[1].fabric_material.as_deref(), Some("Chiffon"));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_summary(&SummaryDataSets::default()).is_empty());
    }

    #[test]
    fn test_summary_columns() {
        let columns = summary_columns();
        let fields: Vec<_> = columns.iter().map(|c| c.fieldname.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "fabric_material",
                "no_of_orders",
                "ordered_qty",
                "received_qty",
                "produced_qty",
                "packed_qty",
                "delivered_qty",
            ]
        );
        assert_eq!(columns[0].options.as_deref(), Some("Fabric Material"));
        assert_eq!(columns[3].width, 125);
    }

    // ========================================================================
    // Property-Based Tests
    // ========================================================================

    use proptest::prelude::*;

    fn material_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("Cotton".to_string())),
            Just(Some("Lawn".to_string())),
            Just(Some("Silk".to_string())),
        ]
    }

    /// At most one entry per material, as the grouped queries return them
    fn quantities_strategy() -> impl Strategy<Value = Vec<MaterialQuantity>> {
        prop::collection::btree_map(material_strategy(), 1i64..5_000, 0..4).prop_map(|m| {
            m.into_iter()
                .map(|(fabric_material, qty)| MaterialQuantity {
                    fabric_material,
                    qty: Decimal::from(qty),
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Rows are unique per material, sorted, and carry every quantity exactly once
        #[test]
        fn prop_merge_rows_unique_and_sorted(
            received in quantities_strategy(),
            packed in quantities_strategy(),
        ) {
            let sets = SummaryDataSets {
                received: received.clone(),
                packed: packed.clone(),
                ..Default::default()
            };

            let rows = merge_summary(&sets);

            let materials: Vec<_> = rows.iter().map(|r| r.fabric_material.clone()).collect();
            let mut sorted = materials.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(&materials, &sorted);

            let received_total: Decimal = rows.iter().map(|r| r.received_qty).sum();
            let packed_total: Decimal = rows.iter().map(|r| r.packed_qty).sum();
            prop_assert_eq!(received_total, received.iter().map(|d| d.qty).sum::<Decimal>());
            prop_assert_eq!(packed_total, packed.iter().map(|d| d.qty).sum::<Decimal>());
            prop_assert!(rows.iter().all(|r| r.no_of_orders == 0 && r.produced_qty.is_zero()));
        }
    }
}
