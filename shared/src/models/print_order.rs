//! Print order models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line of a print order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrintOrderItem {
    pub idx: i32,
    pub item_code: String,
    pub qty: Decimal,
    /// Number of panels when the design is ordered by panel
    pub panel_qty: Decimal,
    pub print_length: Decimal,
    /// Print length in the fabric's stock unit
    pub stock_print_length: Decimal,
    #[serde(default)]
    pub panel_based_qty: bool,
}

/// A customer order to print designs on fabric
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrintOrder {
    pub name: String,
    pub fabric_item: Option<String>,
    pub transaction_date: NaiveDate,
    pub docstatus: i16,
    pub items: Vec<PrintOrderItem>,
    pub total_qty: Decimal,
    pub total_panel_qty: Decimal,
    pub total_print_length: Decimal,
}

impl PrintOrder {
    /// Refresh line panel flags and order totals from the lines
    pub fn calculate_totals(&mut self) {
        for d in &mut self.items {
            d.panel_based_qty = d.panel_qty > Decimal::ZERO;
        }

        self.total_qty = self.items.iter().map(|d| d.qty).sum();
        self.total_panel_qty = self.items.iter().map(|d| d.panel_qty).sum();
        self.total_print_length = self.items.iter().map(|d| d.stock_print_length).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(idx: i32, qty: i64, panel_qty: i64, length: i64) -> PrintOrderItem {
        PrintOrderItem {
            idx,
            item_code: format!("DESIGN-{}", idx),
            qty: Decimal::from(qty),
            panel_qty: Decimal::from(panel_qty),
            print_length: Decimal::from(length),
            stock_print_length: Decimal::from(length),
            panel_based_qty: false,
        }
    }

    #[test]
    fn test_calculate_totals() {
        let mut order = PrintOrder {
            name: "PRO-0001".to_string(),
            fabric_item: Some("FAB-LAWN-60".to_string()),
            transaction_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            docstatus: 1,
            items: vec![line(1, 100, 0, 100), line(2, 40, 8, 42)],
            total_qty: Decimal::ZERO,
            total_panel_qty: Decimal::ZERO,
            total_print_length: Decimal::ZERO,
        };

        order.calculate_totals();

        assert!(!order.items[0].panel_based_qty);
        assert!(order.items[1].panel_based_qty);
        assert_eq!(order.total_qty, Decimal::from(140));
        assert_eq!(order.total_panel_qty, Decimal::from(8));
        assert_eq!(order.total_print_length, Decimal::from(142));
    }
}
