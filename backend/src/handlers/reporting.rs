//! Reporting handlers for the fabric printing summary

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reporting::{summary_filter, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub format: Option<String>, // "json" or "csv"
}

/// Get the fabric printing summary
pub async fn get_fabric_printing_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<impl IntoResponse> {
    let service = state.reporting_service();
    let filter = summary_filter(query.from_date, query.to_date);

    let report = service.fabric_printing_summary(&filter).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&report.data)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"fabric_printing_summary.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(report).into_response())
    }
}
