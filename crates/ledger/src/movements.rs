//! Financial movement primitives.
//!
//! A `Movement` is one income (`ingreso`) or expense (`egreso`) record tied
//! to a project and, when the project had a contract at record time, to
//! that contract. The movements collection is append-only: no operation in
//! this crate updates or deletes a persisted movement, and balances are
//! always re-derived from the rows.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Income,
    Expense,
}

impl MovementKind {
    /// Canonical kind string used by the database (`ingreso`/`egreso`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "ingreso",
            Self::Expense => "egreso",
        }
    }
}

impl TryFrom<&str> for MovementKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ingreso" => Ok(Self::Income),
            "egreso" => Ok(Self::Expense),
            other => Err(LedgerError::Validation(format!(
                "invalid movement kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub project_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub kind: MovementKind,
    pub description: String,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
}

impl Movement {
    pub fn new(
        project_id: Uuid,
        contract_id: Option<Uuid>,
        kind: MovementKind,
        description: String,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> ResultLedger<Self> {
        if amount_minor <= 0 {
            return Err(LedgerError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            contract_id,
            kind,
            description,
            amount_minor,
            occurred_at,
        })
    }
}

/// Input shape for a movement to record, validated before any store access.
#[derive(Clone, Debug, Deserialize)]
pub struct MovementDraft {
    pub project_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
}

impl MovementDraft {
    /// Returns every constraint the draft violates, empty when valid.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.amount_minor <= 0 {
            violations.push("amount must be > 0".to_string());
        }
        if self.description.chars().count() < 5 {
            violations.push("description must be at least 5 characters".to_string());
        }
        violations
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub contract_id: Option<String>,
    pub kind: String,
    pub description: String,
    pub amount_minor: i64,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Projects,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Movement> for ActiveModel {
    fn from(movement: &Movement) -> Self {
        Self {
            id: ActiveValue::Set(movement.id.to_string()),
            project_id: ActiveValue::Set(movement.project_id.to_string()),
            contract_id: ActiveValue::Set(movement.contract_id.map(|id| id.to_string())),
            kind: ActiveValue::Set(movement.kind.as_str().to_string()),
            description: ActiveValue::Set(movement.description.clone()),
            amount_minor: ActiveValue::Set(movement.amount_minor),
            occurred_at: ActiveValue::Set(movement.occurred_at),
        }
    }
}

impl TryFrom<Model> for Movement {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "movement")?,
            project_id: parse_uuid(&model.project_id, "project")?,
            contract_id: match model.contract_id {
                Some(raw) => Some(parse_uuid(&raw, "contract")?),
                None => None,
            },
            kind: MovementKind::try_from(model.kind.as_str())?,
            description: model.description,
            amount_minor: model.amount_minor,
            occurred_at: model.occurred_at,
        })
    }
}
