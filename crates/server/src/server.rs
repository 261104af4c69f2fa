use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use ledger::Ledger;

use crate::{clients, contracts, movements, projects, reports, statistics};

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
}

/// Build the API router over a shared ledger.
pub fn app(ledger: Arc<Ledger>) -> Router {
    router(ServerState { ledger })
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/clients", post(clients::create))
        .route(
            "/clients/{client_id}/balance",
            get(statistics::client_balance),
        )
        .route("/projects", post(projects::create))
        .route("/projects/{project_id}/state", patch(projects::set_state))
        .route(
            "/projects/{project_id}/balance",
            get(statistics::project_balance),
        )
        .route("/contracts", post(contracts::create))
        .route("/income", post(movements::income_new))
        .route("/expense", post(movements::expense_new))
        .route("/movements", get(movements::list))
        .route("/reports/range", get(reports::range))
        .route("/reports/week", get(reports::last_week))
        .route("/reports/month", get(reports::last_month))
        .with_state(state)
}

/// Serve the API on an already-bound listener.
pub async fn run_with_listener(
    ledger: Ledger,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let app = app(Arc::new(ledger));
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}
