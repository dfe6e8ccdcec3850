//! Item lifecycle tests
//!
//! Tests for the item save path including:
//! - Role rules for fabrics, print processes and printed designs
//! - Fabric properties propagated onto printed designs
//! - Net weight derivation and the Yard conversion edge

use std::str::FromStr;
use std::sync::Arc;

use dp_backend::config::ItemSettings;
use dp_backend::error::AppError;
use dp_backend::services::ItemService;
use dp_backend::store::{InMemoryItemStore, ItemStore};
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::{
    DesignProperties, FabricProperties, Item, PrintItemType, UomConversion, ValidationError, METER,
    YARD,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn lawn_fabric() -> Item {
    Item {
        item_name: Some("Lawn 60\"".to_string()),
        print_item_type: Some(PrintItemType::Fabric),
        is_stock_item: true,
        stock_uom: Some(METER.to_string()),
        fabric: FabricProperties {
            fabric_material: Some("Cotton".to_string()),
            fabric_type: Some("Lawn".to_string()),
            fabric_width: Some(dec("60")),
            fabric_gsm: Some(dec("200")),
            fabric_construction: Some("80x80".to_string()),
        },
        ..Item::new("FAB-LAWN-60")
    }
}

fn reactive_process() -> Item {
    Item {
        item_name: Some("Reactive Printing".to_string()),
        print_item_type: Some(PrintItemType::PrintProcess),
        stock_uom: Some(METER.to_string()),
        ..Item::new("PROC-REACTIVE")
    }
}

fn paisley_design() -> Item {
    Item {
        print_item_type: Some(PrintItemType::PrintedDesign),
        is_stock_item: true,
        stock_uom: Some(METER.to_string()),
        fabric_item: Some("FAB-LAWN-60".to_string()),
        process_item: Some("PROC-REACTIVE".to_string()),
        design: DesignProperties {
            design_name: Some("Paisley Blue".to_string()),
            design_width: Some(dec("58")),
            design_height: Some(dec("36")),
            design_uom: Some("Inch".to_string()),
            design_gap: Some(dec("1")),
            per_wastage: Some(dec("2.5")),
            design_notes: None,
        },
        ..Item::new("DSN-PAISLEY")
    }
}

fn seeded_store() -> Arc<InMemoryItemStore> {
    let mut fabric = lawn_fabric();
    fabric.uom_conversion_graph.push(UomConversion::yard_to_meter());
    Arc::new(InMemoryItemStore::with_items([fabric, reactive_process()]))
}

fn service(store: Arc<InMemoryItemStore>) -> ItemService {
    ItemService::new(store, ItemSettings::default())
}

fn validation_error(err: AppError) -> ValidationError {
    match err {
        AppError::Validation(err) => err,
        other => panic!("expected validation error, got {:?}", other),
    }
}

fn yard_edges(item: &Item) -> usize {
    item.uom_conversion_graph
        .iter()
        .filter(|d| d.involves(YARD))
        .count()
}

// ============================================================================
// Fabric
// ============================================================================

#[tokio::test]
async fn test_fabric_saved_with_weight_and_yard_edge() {
    let store = Arc::new(InMemoryItemStore::new());
    let saved = service(store.clone()).save(lawn_fabric()).await.unwrap();

    assert_eq!(saved.net_weight_per_unit, Some(dec("304.8")));
    assert_eq!(saved.gross_weight_per_unit, Some(Decimal::ZERO));
    assert_eq!(saved.weight_uom.as_deref(), Some("Gram"));
    assert_eq!(saved.uom_conversion_graph, vec![UomConversion::yard_to_meter()]);

    let stored = store.find_item("FAB-LAWN-60").await.unwrap().unwrap();
    assert_eq!(stored, saved);
}

#[tokio::test]
async fn test_fabric_without_width_rejected() {
    let store = Arc::new(InMemoryItemStore::new());
    let mut item = lawn_fabric();
    item.fabric.fabric_width = None;

    let err = validation_error(service(store.clone()).save(item).await.unwrap_err());

    assert_eq!(err.field(), "fabric_width");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_fabric_without_material_rejected() {
    let store = Arc::new(InMemoryItemStore::new());
    let mut item = lawn_fabric();
    item.fabric.fabric_material = Some("  ".to_string());

    let err = validation_error(service(store.clone()).save(item).await.unwrap_err());

    assert_eq!(err.field(), "fabric_material");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_fabric_must_be_stocked_in_meters() {
    let store = Arc::new(InMemoryItemStore::new());
    let mut item = lawn_fabric();
    item.stock_uom = Some("Yard".to_string());

    let err = validation_error(service(store).save(item).await.unwrap_err());

    assert_eq!(err.code(), "INVALID_UOM");
    assert_eq!(err.to_string(), "Default Unit of Measure must be Meter");
}

#[tokio::test]
async fn test_resave_does_not_duplicate_yard_edge() {
    let store = Arc::new(InMemoryItemStore::new());
    let service = service(store.clone());

    let saved = service.save(lawn_fabric()).await.unwrap();
    let resaved = service.save(saved).await.unwrap();

    assert_eq!(yard_edges(&resaved), 1);
    assert_eq!(resaved.uom_conversion_graph.len(), 1);
}

#[tokio::test]
async fn test_fabric_drops_design_fields() {
    let store = Arc::new(InMemoryItemStore::new());
    let mut item = lawn_fabric();
    item.design.design_name = Some("Leftover".to_string());
    item.process_item = Some("PROC-REACTIVE".to_string());
    item.fabric_item = Some("FAB-OTHER".to_string());

    let saved = service(store).save(item).await.unwrap();

    assert_eq!(saved.design, DesignProperties::default());
    assert_eq!(saved.process_item, None);
    assert_eq!(saved.fabric_item, None);
    assert_eq!(saved.fabric, lawn_fabric().fabric);
}

// ============================================================================
// Print process
// ============================================================================

#[tokio::test]
async fn test_print_process_clears_physical_properties() {
    let store = Arc::new(InMemoryItemStore::new());
    let mut item = reactive_process();
    item.fabric = lawn_fabric().fabric;

    let saved = service(store).save(item).await.unwrap();

    assert_eq!(saved.fabric, FabricProperties::default());
    assert_eq!(saved.net_weight_per_unit, None);
    assert!(saved.uom_conversion_graph.is_empty());
}

#[tokio::test]
async fn test_print_process_cannot_be_stock_item() {
    let store = Arc::new(InMemoryItemStore::new());
    let mut item = reactive_process();
    item.is_stock_item = true;

    let err = validation_error(service(store).save(item).await.unwrap_err());
    assert_eq!(err.to_string(), "Print Process Item cannot be a Stock Item");
}

#[tokio::test]
async fn test_print_process_cannot_be_fixed_asset() {
    let store = Arc::new(InMemoryItemStore::new());
    let mut item = reactive_process();
    item.is_fixed_asset = true;

    let err = validation_error(service(store).save(item).await.unwrap_err());
    assert_eq!(err.to_string(), "Print Process Item cannot be a Fixed Asset");
}

// ============================================================================
// Printed design
// ============================================================================

#[tokio::test]
async fn test_printed_design_copies_fabric_properties() {
    let store = seeded_store();
    let mut item = paisley_design();
    item.fabric.fabric_material = Some("Stale".to_string());

    let saved = service(store).save(item).await.unwrap();

    assert_eq!(saved.fabric, lawn_fabric().fabric);
    assert_eq!(saved.design.design_name.as_deref(), Some("Paisley Blue"));
    assert_eq!(saved.fabric_item.as_deref(), Some("FAB-LAWN-60"));
    assert_eq!(saved.process_item.as_deref(), Some("PROC-REACTIVE"));
    assert_eq!(yard_edges(&saved), 1);
}

#[tokio::test]
async fn test_printed_design_weight_from_saved_gsm() {
    let store = seeded_store();
    let service = service(store);

    // Weight is derived before the fabric's properties are copied in
    let first = service.save(paisley_design()).await.unwrap();
    assert_eq!(first.net_weight_per_unit, None);

    let second = service.save(first).await.unwrap();
    assert_eq!(second.net_weight_per_unit, Some(dec("304.8")));
    assert_eq!(second.gross_weight_per_unit, Some(Decimal::ZERO));
}

#[tokio::test]
async fn test_printed_design_fabric_must_be_fabric() {
    let store = seeded_store();
    let mut item = paisley_design();
    item.fabric_item = Some("PROC-REACTIVE".to_string());

    let err = validation_error(service(store).save(item).await.unwrap_err());

    assert_eq!(err.to_string(), "Item PROC-REACTIVE is not a Fabric Item");
    assert_eq!(err.field(), "fabric_item");
}

#[tokio::test]
async fn test_printed_design_process_must_be_print_process() {
    let store = seeded_store();
    let mut item = paisley_design();
    item.process_item = Some("FAB-LAWN-60".to_string());

    let err = validation_error(service(store).save(item).await.unwrap_err());

    assert_eq!(err.to_string(), "Item FAB-LAWN-60 is not a Print Process Item");
}

#[tokio::test]
async fn test_printed_design_unknown_fabric_rejected() {
    let store = seeded_store();
    let mut item = paisley_design();
    item.fabric_item = Some("FAB-MISSING".to_string());

    let err = validation_error(service(store.clone()).save(item).await.unwrap_err());

    assert!(matches!(err, ValidationError::RoleMismatch { .. }));
    assert!(store.find_item("DSN-PAISLEY").await.unwrap().is_none());
}

#[tokio::test]
async fn test_printed_design_mandatory_fields() {
    let store = seeded_store();
    let service = service(store);

    let mut item = paisley_design();
    item.design.design_name = None;
    let err = validation_error(service.save(item).await.unwrap_err());
    assert_eq!(err.to_string(), "Design Name is mandatory for Printed Design Item");

    let mut item = paisley_design();
    item.fabric_item = None;
    let err = validation_error(service.save(item).await.unwrap_err());
    assert_eq!(err.to_string(), "Fabric Item is mandatory for Printed Design Item");

    let mut item = paisley_design();
    item.process_item = None;
    let err = validation_error(service.save(item).await.unwrap_err());
    assert_eq!(err.to_string(), "Print Process Item is mandatory for Printed Design Item");

    let mut item = paisley_design();
    item.is_stock_item = false;
    let err = validation_error(service.save(item).await.unwrap_err());
    assert_eq!(err.to_string(), "Printed Design Item must be a Stock Item");
}

#[tokio::test]
async fn test_reference_roles_looked_up_once_per_save() {
    let store = seeded_store();
    service(store.clone()).save(paisley_design()).await.unwrap();

    assert_eq!(store.role_lookups(), 2);
}

#[tokio::test]
async fn test_reclassified_design_loses_design_data() {
    let store = seeded_store();
    let service = service(store);
    let saved = service.save(paisley_design()).await.unwrap();

    let mut item = saved;
    item.print_item_type = None;
    item.stock_uom = Some("Nos".to_string());
    let saved = service.save(item).await.unwrap();

    assert_eq!(saved.design, DesignProperties::default());
    assert_eq!(saved.fabric, FabricProperties::default());
    assert_eq!(saved.fabric_item, None);
    assert_eq!(saved.process_item, None);
}

// ============================================================================
// Basic checks
// ============================================================================

#[tokio::test]
async fn test_stock_uom_required() {
    let store = Arc::new(InMemoryItemStore::new());
    let item = Item::new("GENERIC");

    let err = validation_error(service(store).save(item).await.unwrap_err());
    assert_eq!(err.field(), "stock_uom");
}

#[tokio::test]
async fn test_get_missing_item() {
    let store = Arc::new(InMemoryItemStore::new());
    let err = service(store).get("NOPE").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_configured_precision_applied() {
    let store = Arc::new(InMemoryItemStore::new());
    let service = ItemService::new(store, ItemSettings { float_precision: 1 });
    let mut item = lawn_fabric();
    item.fabric.fabric_gsm = Some(dec("135"));
    item.fabric.fabric_width = Some(dec("44"));

    let saved = service.save(item).await.unwrap();
    // 135 × 44 × 0.0254 = 150.876
    assert_eq!(saved.net_weight_per_unit, Some(dec("150.9")));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Net weight follows gsm × width × 0.0254 for any positive gsm
    #[test]
    fn prop_net_weight_formula(gsm in 1i64..=600, width in 1i64..=120) {
        let store = Arc::new(InMemoryItemStore::new());
        let mut item = lawn_fabric();
        item.fabric.fabric_gsm = Some(Decimal::from(gsm));
        item.fabric.fabric_width = Some(Decimal::from(width));

        let saved = tokio_test::block_on(service(store).save(item)).unwrap();

        let expected = Decimal::from(gsm * width) * dec("0.0254");
        prop_assert_eq!(
            saved.net_weight_per_unit,
            Some(expected.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero))
        );
        prop_assert_eq!(saved.gross_weight_per_unit, Some(Decimal::ZERO));
    }

    /// Exactly one Yard edge however often a fabric is saved
    #[test]
    fn prop_yard_edge_unique(saves in 1usize..5) {
        let store = Arc::new(InMemoryItemStore::new());
        let service = service(store);
        let mut item = lawn_fabric();

        for _ in 0..saves {
            item = tokio_test::block_on(service.save(item)).unwrap();
        }

        prop_assert_eq!(yard_edges(&item), 1);
    }
}
