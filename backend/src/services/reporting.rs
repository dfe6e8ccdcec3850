//! Reporting service for the fabric printing summary
//! Aggregates orders, fabric receipts, production, packing and deliveries by fabric material

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    merge_summary, summary_columns, FabricPrintingSummary, MaterialQuantity, OrderAggregate,
    SummaryDataSets, SummaryFilter,
};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::error::{AppError, AppResult};

/// Source of the five aggregate sets behind the summary
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Submitted print orders per material of the order's fabric
    async fn order_data(&self, filter: &SummaryFilter) -> AppResult<Vec<OrderAggregate>>;

    /// Customer-provided fabric received into stock
    async fn fabric_received_data(&self, filter: &SummaryFilter) -> AppResult<Vec<MaterialQuantity>>;

    /// Finished quantity manufactured against print orders
    async fn production_data(&self, filter: &SummaryFilter) -> AppResult<Vec<MaterialQuantity>>;

    /// Quantity packed against print orders
    async fn packing_data(&self, filter: &SummaryFilter) -> AppResult<Vec<MaterialQuantity>>;

    /// Quantity delivered against print orders
    async fn delivery_data(&self, filter: &SummaryFilter) -> AppResult<Vec<MaterialQuantity>>;
}

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    source: Arc<dyn SummarySource>,
}

impl ReportingService {
    pub fn new(source: Arc<dyn SummarySource>) -> Self {
        Self { source }
    }

    /// Build the fabric printing summary for a date range
    pub async fn fabric_printing_summary(
        &self,
        filter: &SummaryFilter,
    ) -> AppResult<FabricPrintingSummary> {
        filter.validate()?;

        let sets = SummaryDataSets {
            orders: self.source.order_data(filter).await?,
            received: self.source.fabric_received_data(filter).await?,
            produced: self.source.production_data(filter).await?,
            packed: self.source.packing_data(filter).await?,
            delivered: self.source.delivery_data(filter).await?,
        };

        let data = merge_summary(&sets);
        tracing::debug!(
            from_date = %filter.from_date,
            to_date = %filter.to_date,
            rows = data.len(),
            "Fabric printing summary built"
        );

        Ok(FabricPrintingSummary {
            columns: summary_columns(),
            data,
        })
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

/// Summary source reading submitted documents from Postgres
#[derive(Clone)]
pub struct PgSummarySource {
    db: PgPool,
}

impl PgSummarySource {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn material_quantities(
        &self,
        sql: &str,
        filter: &SummaryFilter,
    ) -> AppResult<Vec<MaterialQuantity>> {
        let rows = sqlx::query_as::<_, MaterialQuantityRow>(sql)
            .bind(filter.from_date)
            .bind(filter.to_date)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Row for order aggregate query
#[derive(Debug, FromRow)]
struct OrderAggregateRow {
    fabric_material: Option<String>,
    no_of_orders: i64,
    ordered_qty: Option<Decimal>,
}

/// Row for material quantity queries
#[derive(Debug, FromRow)]
struct MaterialQuantityRow {
    fabric_material: Option<String>,
    qty: Option<Decimal>,
}

impl From<MaterialQuantityRow> for MaterialQuantity {
    fn from(row: MaterialQuantityRow) -> Self {
        MaterialQuantity {
            fabric_material: row.fabric_material,
            qty: row.qty.unwrap_or_default(),
        }
    }
}

const FABRIC_RECEIVED_SQL: &str = r#"
    SELECT item.fabric_material, SUM(sed.transfer_qty) AS qty
    FROM stock_entry_details sed
    INNER JOIN stock_entries se ON se.name = sed.parent
    LEFT JOIN items item ON item.name = sed.item_code
    WHERE se.docstatus = 1
      AND se.posting_date BETWEEN $1 AND $2
      AND se.customer_provided = TRUE
      AND item.textile_item_type IN ('Greige Fabric', 'Ready Fabric')
    GROUP BY item.fabric_material
"#;

const PRODUCTION_SQL: &str = r#"
    SELECT item.fabric_material, SUM(se.fg_completed_qty) AS qty
    FROM stock_entries se
    INNER JOIN work_orders wo ON wo.name = se.work_order
    LEFT JOIN items item ON item.name = wo.fabric_item
    WHERE se.docstatus = 1
      AND se.posting_date BETWEEN $1 AND $2
      AND se.purpose = 'Manufacture'
      AND COALESCE(wo.print_order, '') != ''
    GROUP BY item.fabric_material
"#;

const PACKING_SQL: &str = r#"
    SELECT item.fabric_material, SUM(psi.stock_qty) AS qty
    FROM packing_slip_items psi
    INNER JOIN packing_slips ps ON ps.name = psi.parent
    INNER JOIN items item ON item.name = psi.item_code
    WHERE ps.docstatus = 1
      AND ps.posting_date BETWEEN $1 AND $2
      AND COALESCE(psi.print_order, '') != ''
      AND COALESCE(psi.source_packing_slip, '') = ''
    GROUP BY item.fabric_material
"#;

const DELIVERY_SQL: &str = r#"
    SELECT item.fabric_material, SUM(dni.stock_qty) AS qty
    FROM delivery_note_items dni
    INNER JOIN delivery_notes dn ON dn.name = dni.parent
    INNER JOIN items item ON item.name = dni.item_code
    WHERE dn.docstatus = 1
      AND dn.posting_date BETWEEN $1 AND $2
      AND dn.is_return = FALSE
      AND COALESCE(dni.print_order, '') != ''
      AND dni.is_return_fabric = FALSE
    GROUP BY item.fabric_material
"#;

#[async_trait]
impl SummarySource for PgSummarySource {
    async fn order_data(&self, filter: &SummaryFilter) -> AppResult<Vec<OrderAggregate>> {
        let rows = sqlx::query_as::<_, OrderAggregateRow>(
            r#"
            SELECT item.fabric_material,
                COUNT(DISTINCT pro.name) AS no_of_orders,
                SUM(poi.stock_print_length) AS ordered_qty
            FROM print_order_items poi
            INNER JOIN print_orders pro ON pro.name = poi.parent
            INNER JOIN items item ON item.name = pro.fabric_item
            WHERE pro.docstatus = 1
              AND pro.transaction_date BETWEEN $1 AND $2
            GROUP BY item.fabric_material
            "#,
        )
        .bind(filter.from_date)
        .bind(filter.to_date)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| OrderAggregate {
                fabric_material: row.fabric_material,
                no_of_orders: row.no_of_orders,
                ordered_qty: row.ordered_qty.unwrap_or_default(),
            })
            .collect())
    }

    async fn fabric_received_data(&self, filter: &SummaryFilter) -> AppResult<Vec<MaterialQuantity>> {
        self.material_quantities(FABRIC_RECEIVED_SQL, filter).await
    }

    async fn production_data(&self, filter: &SummaryFilter) -> AppResult<Vec<MaterialQuantity>> {
        self.material_quantities(PRODUCTION_SQL, filter).await
    }

    async fn packing_data(&self, filter: &SummaryFilter) -> AppResult<Vec<MaterialQuantity>> {
        self.material_quantities(PACKING_SQL, filter).await
    }

    async fn delivery_data(&self, filter: &SummaryFilter) -> AppResult<Vec<MaterialQuantity>> {
        self.material_quantities(DELIVERY_SQL, filter).await
    }
}

/// Summary filter with missing dates defaulting to today
pub fn summary_filter(from_date: Option<NaiveDate>, to_date: Option<NaiveDate>) -> SummaryFilter {
    let today = chrono::Local::now().date_naive();
    SummaryFilter::new(from_date.unwrap_or(today), to_date.unwrap_or(today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::FabricPrintingSummaryRow;

    #[test]
    fn test_export_rows_to_csv() {
        let mut row = FabricPrintingSummaryRow::empty(Some("Cotton".to_string()));
        row.no_of_orders = 2;
        row.ordered_qty = Decimal::from(350);

        let csv = ReportingService::export_to_csv(&[row]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("fabric_material,no_of_orders,ordered_qty,received_qty,produced_qty,packed_qty,delivered_qty")
        );
        assert_eq!(lines.next(), Some("Cotton,2,350,0,0,0,0"));
    }

    #[test]
    fn test_summary_filter_defaults_to_today() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let filter = summary_filter(Some(from), None);
        assert_eq!(filter.from_date, from);
        assert_eq!(filter.to_date, chrono::Local::now().date_naive());
    }
}
