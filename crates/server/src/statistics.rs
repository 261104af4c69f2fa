//! Balance API endpoints.

use api_types::balance::{ClientBalanceResponse, ProjectBalanceResponse, ProjectSummaryRow};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn project_balance(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectBalanceResponse>, ServerError> {
    let balance = state.ledger.balance_for_project(project_id).await?;
    Ok(Json(ProjectBalanceResponse {
        project_id: balance.project_id,
        contract_id: balance.contract_id,
        total_income_minor: balance.balance.total_income_minor,
        total_expense_minor: balance.balance.total_expense_minor,
        net_minor: balance.balance.net_minor(),
    }))
}

pub async fn client_balance(
    State(state): State<ServerState>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ClientBalanceResponse>, ServerError> {
    let summaries = state.ledger.balance_for_client(client_id).await?;
    let projects = summaries
        .into_iter()
        .map(|row| ProjectSummaryRow {
            project_id: row.project_id,
            project_name: row.project_name,
            contract_value_minor: row.contract_value_minor,
            total_income_minor: row.total_income_minor,
            total_expense_minor: row.total_expense_minor,
            net_minor: row.net_minor,
        })
        .collect();
    Ok(Json(ClientBalanceResponse {
        client_id,
        projects,
    }))
}
