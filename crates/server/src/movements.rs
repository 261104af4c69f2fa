//! Movement recording and listing endpoints.

use api_types::movement::{
    MovementCreated, MovementKind as ApiKind, MovementListResponse, MovementNew, MovementView,
};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: ledger::MovementKind) -> ApiKind {
    match kind {
        ledger::MovementKind::Income => ApiKind::Income,
        ledger::MovementKind::Expense => ApiKind::Expense,
    }
}

pub async fn income_new(
    State(state): State<ServerState>,
    Json(payload): Json<MovementNew>,
) -> Result<(StatusCode, Json<MovementCreated>), ServerError> {
    let id = state
        .ledger
        .record_income(payload.project_id, payload.amount_minor, &payload.description)
        .await?;
    Ok((StatusCode::CREATED, Json(MovementCreated { id })))
}

pub async fn expense_new(
    State(state): State<ServerState>,
    Json(payload): Json<MovementNew>,
) -> Result<(StatusCode, Json<MovementCreated>), ServerError> {
    let id = state
        .ledger
        .record_expense(payload.project_id, payload.amount_minor, &payload.description)
        .await?;
    Ok((StatusCode::CREATED, Json(MovementCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<MovementListResponse>, ServerError> {
    let rows = state.ledger.list_movements().await?;
    let movements = rows
        .into_iter()
        .map(|row| MovementView {
            id: row.id,
            occurred_at: row.occurred_at,
            kind: map_kind(row.kind),
            description: row.description,
            amount_minor: row.amount_minor,
            project_name: row.project_name,
        })
        .collect();
    Ok(Json(MovementListResponse { movements }))
}
