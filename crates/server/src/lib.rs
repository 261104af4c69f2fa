use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use serde::Serialize;
pub use server::{ServerState, app, run_with_listener};

mod clients;
mod contracts;
mod movements;
mod projects;
mod reports;
mod server;
mod statistics;

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        // An empty range is a reportable empty result; over HTTP it reads
        // as "nothing there", the caller downgrades it to a warning.
        LedgerError::NotFound(_) | LedgerError::EmptyRange(_) => StatusCode::NOT_FOUND,
        LedgerError::AlreadyExists(_) => StatusCode::CONFLICT,
        LedgerError::Store(_) | LedgerError::InvalidId(_) => StatusCode::INTERNAL_SERVER_ERROR,
        LedgerError::Validation(_) | LedgerError::BalanceExceeded(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Store(db_err) => {
            tracing::error!("store error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => {
                (status_for_ledger_error(&err), message_for_ledger_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = LedgerError::NotFound("project not exists".to_string());
        assert_eq!(status_for_ledger_error(&err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn balance_exceeded_maps_to_422() {
        let err = LedgerError::BalanceExceeded("available: 0".to_string());
        assert_eq!(
            status_for_ledger_error(&err),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn existing_contract_maps_to_409() {
        let err = LedgerError::AlreadyExists("contract for project".to_string());
        assert_eq!(status_for_ledger_error(&err), StatusCode::CONFLICT);
    }

    #[test]
    fn store_error_message_is_redacted() {
        let err = LedgerError::Store(sea_orm_db_err());
        assert_eq!(message_for_ledger_error(err), "internal server error");
    }

    fn sea_orm_db_err() -> sea_orm::DbErr {
        sea_orm::DbErr::Custom("connection lost".to_string())
    }
}
