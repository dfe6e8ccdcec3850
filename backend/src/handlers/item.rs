//! HTTP handlers for item endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{DashboardData, Item, ItemFieldOverrides};
use validator::Validate;

use crate::error::AppResult;
use crate::AppState;

/// Item as submitted for saving
#[derive(Debug, serde::Deserialize, Validate)]
pub struct SaveItemInput {
    #[validate(length(min = 1, max = 140))]
    pub name: String,
    #[serde(flatten)]
    pub item: serde_json::Map<String, serde_json::Value>,
}

impl SaveItemInput {
    fn into_item(self) -> AppResult<Item> {
        let mut fields = self.item;
        fields.insert("name".to_string(), serde_json::Value::String(self.name));
        serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| crate::error::AppError::InvalidInput(e.to_string()))
    }
}

/// Empty item for the new-item form
pub async fn new_item(State(state): State<AppState>) -> Json<Item> {
    Json(state.item_service().new_item())
}

/// Save an item through the item rules
pub async fn save_item(
    State(state): State<AppState>,
    Json(input): Json<SaveItemInput>,
) -> AppResult<Json<Item>> {
    input.validate()?;
    let item = state.item_service().save(input.into_item()?).await?;
    Ok(Json(item))
}

/// Get an item by code
pub async fn get_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Item>> {
    let item = state.item_service().get(&name).await?;
    Ok(Json(item))
}

/// Fields copied onto new items
pub async fn get_override_fields(State(state): State<AppState>) -> Json<ItemFieldOverrides> {
    Json(state.item_service().override_fields())
}

/// Item dashboard layout
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardData>> {
    Ok(Json(state.item_service().dashboard()?))
}
