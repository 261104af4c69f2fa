//! Client directory endpoints.

use api_types::client::{ClientCreated, ClientKind as ApiKind, ClientNew};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: ApiKind) -> ledger::ClientKind {
    match kind {
        ApiKind::Empresa => ledger::ClientKind::Empresa,
        ApiKind::Independiente => ledger::ClientKind::Independiente,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientNew>,
) -> Result<(StatusCode, Json<ClientCreated>), ServerError> {
    let draft = ledger::ClientDraft {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        kind: map_kind(payload.kind),
    };
    let id = state.ledger.new_client(&draft).await?;
    Ok((StatusCode::CREATED, Json(ClientCreated { id })))
}
