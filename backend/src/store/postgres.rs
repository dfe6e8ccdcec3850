use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{DesignProperties, FabricProperties, Item, PrintItemType, UomConversion};
use sqlx::{FromRow, PgPool};

use super::ItemStore;
use crate::error::AppResult;

/// Item store backed by the `items` and `item_uom_conversions` tables
#[derive(Clone)]
pub struct PgItemStore {
    db: PgPool,
}

/// Row for item queries
#[derive(Debug, FromRow)]
struct ItemRow {
    name: String,
    item_name: Option<String>,
    item_group: Option<String>,
    print_item_type: Option<String>,
    is_stock_item: bool,
    is_fixed_asset: bool,
    stock_uom: Option<String>,
    fabric_material: Option<String>,
    fabric_type: Option<String>,
    fabric_width: Option<Decimal>,
    fabric_gsm: Option<Decimal>,
    fabric_construction: Option<String>,
    design_name: Option<String>,
    design_width: Option<Decimal>,
    design_height: Option<Decimal>,
    design_uom: Option<String>,
    design_gap: Option<Decimal>,
    per_wastage: Option<Decimal>,
    design_notes: Option<String>,
    fabric_item: Option<String>,
    process_item: Option<String>,
    net_weight_per_unit: Option<Decimal>,
    gross_weight_per_unit: Option<Decimal>,
    weight_uom: Option<String>,
}

/// Row for conversion graph queries
#[derive(Debug, FromRow)]
struct ConversionRow {
    from_uom: String,
    from_qty: Decimal,
    to_uom: String,
    to_qty: Decimal,
}

impl ItemRow {
    fn into_item(self, uom_conversion_graph: Vec<UomConversion>) -> Item {
        Item {
            name: self.name,
            item_name: self.item_name,
            item_group: self.item_group,
            print_item_type: self
                .print_item_type
                .as_deref()
                .and_then(|label| label.parse().ok()),
            is_stock_item: self.is_stock_item,
            is_fixed_asset: self.is_fixed_asset,
            stock_uom: self.stock_uom,
            fabric: FabricProperties {
                fabric_material: self.fabric_material,
                fabric_type: self.fabric_type,
                fabric_width: self.fabric_width,
                fabric_gsm: self.fabric_gsm,
                fabric_construction: self.fabric_construction,
            },
            design: DesignProperties {
                design_name: self.design_name,
                design_width: self.design_width,
                design_height: self.design_height,
                design_uom: self.design_uom,
                design_gap: self.design_gap,
                per_wastage: self.per_wastage,
                design_notes: self.design_notes,
            },
            fabric_item: self.fabric_item,
            process_item: self.process_item,
            net_weight_per_unit: self.net_weight_per_unit,
            gross_weight_per_unit: self.gross_weight_per_unit,
            weight_uom: self.weight_uom,
            uom_conversion_graph,
        }
    }
}

impl PgItemStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn find_item(&self, name: &str) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT name, item_name, item_group, print_item_type, is_stock_item, is_fixed_asset,
                   stock_uom, fabric_material, fabric_type, fabric_width, fabric_gsm,
                   fabric_construction, design_name, design_width, design_height, design_uom,
                   design_gap, per_wastage, design_notes, fabric_item, process_item,
                   net_weight_per_unit, gross_weight_per_unit, weight_uom
            FROM items
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let conversions = sqlx::query_as::<_, ConversionRow>(
            r#"
            SELECT from_uom, from_qty, to_uom, to_qty
            FROM item_uom_conversions
            WHERE item_code = $1
            ORDER BY idx ASC
            "#,
        )
        .bind(name)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|d| UomConversion {
            from_uom: d.from_uom,
            from_qty: d.from_qty,
            to_uom: d.to_uom,
            to_qty: d.to_qty,
        })
        .collect();

        Ok(Some(row.into_item(conversions)))
    }

    async fn find_print_item_type(&self, name: &str) -> AppResult<Option<PrintItemType>> {
        let role: Option<Option<String>> =
            sqlx::query_scalar("SELECT print_item_type FROM items WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.db)
                .await?;

        Ok(role.flatten().and_then(|label| label.parse().ok()))
    }

    async fn save_item(&self, item: &Item) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO items (
                name, item_name, item_group, print_item_type, is_stock_item, is_fixed_asset,
                stock_uom, fabric_material, fabric_type, fabric_width, fabric_gsm,
                fabric_construction, design_name, design_width, design_height, design_uom,
                design_gap, per_wastage, design_notes, fabric_item, process_item,
                net_weight_per_unit, gross_weight_per_unit, weight_uom, modified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24, NOW())
            ON CONFLICT (name) DO UPDATE SET
                item_name = EXCLUDED.item_name,
                item_group = EXCLUDED.item_group,
                print_item_type = EXCLUDED.print_item_type,
                is_stock_item = EXCLUDED.is_stock_item,
                is_fixed_asset = EXCLUDED.is_fixed_asset,
                stock_uom = EXCLUDED.stock_uom,
                fabric_material = EXCLUDED.fabric_material,
                fabric_type = EXCLUDED.fabric_type,
                fabric_width = EXCLUDED.fabric_width,
                fabric_gsm = EXCLUDED.fabric_gsm,
                fabric_construction = EXCLUDED.fabric_construction,
                design_name = EXCLUDED.design_name,
                design_width = EXCLUDED.design_width,
                design_height = EXCLUDED.design_height,
                design_uom = EXCLUDED.design_uom,
                design_gap = EXCLUDED.design_gap,
                per_wastage = EXCLUDED.per_wastage,
                design_notes = EXCLUDED.design_notes,
                fabric_item = EXCLUDED.fabric_item,
                process_item = EXCLUDED.process_item,
                net_weight_per_unit = EXCLUDED.net_weight_per_unit,
                gross_weight_per_unit = EXCLUDED.gross_weight_per_unit,
                weight_uom = EXCLUDED.weight_uom,
                modified = NOW()
            "#,
        )
        .bind(&item.name)
        .bind(&item.item_name)
        .bind(&item.item_group)
        .bind(item.print_item_type.map(|role| role.as_str()))
        .bind(item.is_stock_item)
        .bind(item.is_fixed_asset)
        .bind(&item.stock_uom)
        .bind(&item.fabric.fabric_material)
        .bind(&item.fabric.fabric_type)
        .bind(item.fabric.fabric_width)
        .bind(item.fabric.fabric_gsm)
        .bind(&item.fabric.fabric_construction)
        .bind(&item.design.design_name)
        .bind(item.design.design_width)
        .bind(item.design.design_height)
        .bind(&item.design.design_uom)
        .bind(item.design.design_gap)
        .bind(item.design.per_wastage)
        .bind(&item.design.design_notes)
        .bind(&item.fabric_item)
        .bind(&item.process_item)
        .bind(item.net_weight_per_unit)
        .bind(item.gross_weight_per_unit)
        .bind(&item.weight_uom)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM item_uom_conversions WHERE item_code = $1")
            .bind(&item.name)
            .execute(&mut *tx)
            .await?;

        for (idx, d) in item.uom_conversion_graph.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO item_uom_conversions (item_code, idx, from_uom, from_qty, to_uom, to_qty)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&item.name)
            .bind(idx as i32 + 1)
            .bind(&d.from_uom)
            .bind(d.from_qty)
            .bind(&d.to_uom)
            .bind(d.to_qty)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
