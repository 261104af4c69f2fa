//! Contract endpoints.

use api_types::contract::{ContractCreated, ContractNew};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

fn map_currency(currency: api_types::Currency) -> ledger::Currency {
    match currency {
        api_types::Currency::Cop => ledger::Currency::Cop,
        api_types::Currency::Usd => ledger::Currency::Usd,
        api_types::Currency::Eur => ledger::Currency::Eur,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ContractNew>,
) -> Result<(StatusCode, Json<ContractCreated>), ServerError> {
    let draft = ledger::ContractDraft {
        project_id: payload.project_id,
        conditions: payload.conditions,
        start_date: payload.start_date,
        end_date: payload.end_date,
        total_value_minor: payload.total_value_minor,
        payment_form: payload.payment_form,
        currency: map_currency(payload.currency),
        penalty_clause: payload.penalty_clause,
        notes: payload.notes,
    };
    let id = state.ledger.new_contract(&draft).await?;
    Ok((StatusCode::CREATED, Json(ContractCreated { id })))
}
