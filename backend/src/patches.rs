//! One-time data patches
//!
//! Each patch runs at most once per database; applied patches are recorded in
//! `patch_log`.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{PrintOrder, PrintOrderItem};
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::error::AppResult;

/// Line item tables whose panel print flag became a panel quantity mode
const PANEL_QTY_TABLES: [&str; 3] = [
    "sales_order_items",
    "delivery_note_items",
    "sales_invoice_items",
];

const SET_PANEL_BASED_QTY: &str = "set_panel_based_qty";

/// Apply every patch not recorded in `patch_log`, returning the names applied
pub async fn run_pending(db: &PgPool) -> AppResult<Vec<&'static str>> {
    let mut applied = Vec::new();

    if !is_applied(db, SET_PANEL_BASED_QTY).await? {
        let mut tx = db.begin().await?;
        let orders = set_panel_based_qty(&mut tx).await?;
        mark_applied(&mut tx, SET_PANEL_BASED_QTY).await?;
        tx.commit().await?;

        tracing::info!(patch = SET_PANEL_BASED_QTY, orders, "Patch applied");
        applied.push(SET_PANEL_BASED_QTY);
    }

    Ok(applied)
}

async fn is_applied(db: &PgPool, name: &str) -> AppResult<bool> {
    let applied = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM patch_log WHERE name = $1)",
    )
    .bind(name)
    .fetch_one(db)
    .await?;
    Ok(applied)
}

async fn mark_applied(tx: &mut Transaction<'_, Postgres>, name: &str) -> AppResult<()> {
    sqlx::query("INSERT INTO patch_log (name, applied_at) VALUES ($1, NOW())")
        .bind(name)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn has_column(tx: &mut Transaction<'_, Postgres>, table: &str, column: &str) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2
        )
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_one(&mut **tx)
    .await?;
    Ok(exists)
}

/// Rename the panel print flag to `panel_based_qty` and refresh print order totals
///
/// Returns the number of print orders recomputed.
async fn set_panel_based_qty(tx: &mut Transaction<'_, Postgres>) -> AppResult<usize> {
    for table in PANEL_QTY_TABLES {
        sqlx::query("DELETE FROM custom_fields WHERE name = $1")
            .bind(format!("{}-show_panel_in_print", table))
            .execute(&mut **tx)
            .await?;

        if has_column(tx, table, "show_panel_in_print").await? {
            // Table names come from the fixed list above
            let sql = format!(
                "ALTER TABLE {} RENAME COLUMN show_panel_in_print TO panel_based_qty",
                table
            );
            sqlx::query(&sql).execute(&mut **tx).await?;
            tracing::debug!(table, "Renamed show_panel_in_print to panel_based_qty");
        }
    }

    refresh_print_orders(tx).await
}

/// Print order access used when refreshing totals
#[async_trait]
pub trait PrintOrderStore: Send {
    async fn print_order_names(&mut self) -> AppResult<Vec<String>>;

    async fn load_print_order(&mut self, name: &str) -> AppResult<PrintOrder>;

    /// Persist line panel flags and order totals
    async fn save_print_order_totals(&mut self, order: &PrintOrder) -> AppResult<()>;
}

/// Recompute line flags and totals of every print order, returning how many were saved
pub async fn refresh_print_orders<S: PrintOrderStore + ?Sized>(store: &mut S) -> AppResult<usize> {
    let names = store.print_order_names().await?;

    for name in &names {
        let mut order = store.load_print_order(name).await?;
        order.calculate_totals();
        store.save_print_order_totals(&order).await?;
    }

    Ok(names.len())
}

/// Row for print order query
#[derive(Debug, FromRow)]
struct PrintOrderRow {
    name: String,
    fabric_item: Option<String>,
    transaction_date: NaiveDate,
    docstatus: i16,
}

/// Row for print order line query
#[derive(Debug, FromRow)]
struct PrintOrderItemRow {
    idx: i32,
    item_code: String,
    qty: Decimal,
    panel_qty: Decimal,
    print_length: Decimal,
    stock_print_length: Decimal,
    panel_based_qty: bool,
}

#[async_trait]
impl<'c> PrintOrderStore for Transaction<'c, Postgres> {
    async fn print_order_names(&mut self) -> AppResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM print_orders ORDER BY name")
            .fetch_all(&mut **self)
            .await?;
        Ok(names)
    }

    async fn load_print_order(&mut self, name: &str) -> AppResult<PrintOrder> {
        let row = sqlx::query_as::<_, PrintOrderRow>(
            "SELECT name, fabric_item, transaction_date, docstatus FROM print_orders WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&mut **self)
        .await?;

        let items = sqlx::query_as::<_, PrintOrderItemRow>(
            r#"
            SELECT idx, item_code, qty, panel_qty, print_length, stock_print_length, panel_based_qty
            FROM print_order_items
            WHERE parent = $1
            ORDER BY idx ASC
            "#,
        )
        .bind(name)
        .fetch_all(&mut **self)
        .await?
        .into_iter()
        .map(|d| PrintOrderItem {
            idx: d.idx,
            item_code: d.item_code,
            qty: d.qty,
            panel_qty: d.panel_qty,
            print_length: d.print_length,
            stock_print_length: d.stock_print_length,
            panel_based_qty: d.panel_based_qty,
        })
        .collect();

        Ok(PrintOrder {
            name: row.name,
            fabric_item: row.fabric_item,
            transaction_date: row.transaction_date,
            docstatus: row.docstatus,
            items,
            total_qty: Decimal::ZERO,
            total_panel_qty: Decimal::ZERO,
            total_print_length: Decimal::ZERO,
        })
    }

    /// Line flags and totals are written without touching the modified timestamp
    async fn save_print_order_totals(&mut self, order: &PrintOrder) -> AppResult<()> {
        for d in &order.items {
            sqlx::query(
                "UPDATE print_order_items SET panel_based_qty = $1 WHERE parent = $2 AND idx = $3",
            )
            .bind(d.panel_based_qty)
            .bind(&order.name)
            .bind(d.idx)
            .execute(&mut **self)
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE print_orders
            SET total_qty = $1, total_panel_qty = $2, total_print_length = $3
            WHERE name = $4
            "#,
        )
        .bind(order.total_qty)
        .bind(order.total_panel_qty)
        .bind(order.total_print_length)
        .bind(&order.name)
        .execute(&mut **self)
        .await?;

        Ok(())
    }
}
