//! Internal helpers shared by the entity modules.

use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Parse a UUID loaded from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultLedger<Uuid> {
    Uuid::parse_str(value).map_err(|_| LedgerError::InvalidId(format!("invalid {label} id")))
}
