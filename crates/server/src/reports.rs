//! Range report endpoints.

use api_types::report::{ProjectRangeRow, RangeQuery, RangeReportResponse};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};

fn map_rows(rows: Vec<ledger::ProjectRangeSummary>) -> RangeReportResponse {
    let projects = rows
        .into_iter()
        .map(|row| ProjectRangeRow {
            project_id: row.project_id,
            project_name: row.project_name,
            total_income_minor: row.total_income_minor,
            total_expense_minor: row.total_expense_minor,
            net_minor: row.net_minor,
        })
        .collect();
    RangeReportResponse { projects }
}

pub async fn range(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RangeReportResponse>, ServerError> {
    let rows = state.ledger.range_summary(query.start, query.end).await?;
    Ok(Json(map_rows(rows)))
}

pub async fn last_week(
    State(state): State<ServerState>,
) -> Result<Json<RangeReportResponse>, ServerError> {
    let rows = state.ledger.last_week_summary().await?;
    Ok(Json(map_rows(rows)))
}

pub async fn last_month(
    State(state): State<ServerState>,
) -> Result<Json<RangeReportResponse>, ServerError> {
    let rows = state.ledger.last_month_summary().await?;
    Ok(Json(map_rows(rows)))
}
