//! Project directory endpoints.

use api_types::project::{
    ProjectCreated, ProjectNew, ProjectState as ApiState, ProjectStateUpdate,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_state(state: ApiState) -> ledger::ProjectState {
    match state {
        ApiState::Activo => ledger::ProjectState::Activo,
        ApiState::Pausado => ledger::ProjectState::Pausado,
        ApiState::Finalizado => ledger::ProjectState::Finalizado,
        ApiState::Cancelado => ledger::ProjectState::Cancelado,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<(StatusCode, Json<ProjectCreated>), ServerError> {
    let draft = ledger::ProjectDraft {
        client_id: payload.client_id,
        name: payload.name,
        description: payload.description,
        term_days: payload.term_days,
        state: map_state(payload.state),
        proposal_id: payload.proposal_id,
    };
    let id = state.ledger.new_project(&draft).await?;
    Ok((StatusCode::CREATED, Json(ProjectCreated { id })))
}

pub async fn set_state(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<ProjectStateUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .set_project_state(project_id, map_state(payload.state))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
