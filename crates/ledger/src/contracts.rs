//! Contract entries.
//!
//! A contract binds a project to a face value and is immutable after
//! creation. The face value is the ceiling for cumulative income on the
//! project; at most one contract may exist per project, enforced at
//! creation time rather than by a database constraint.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, LedgerError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub project_id: Uuid,
    pub conditions: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_value_minor: i64,
    pub payment_form: String,
    pub currency: Currency,
    pub penalty_clause: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input shape for a new contract, validated before persistence.
#[derive(Clone, Debug, Deserialize)]
pub struct ContractDraft {
    pub project_id: Uuid,
    pub conditions: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_value_minor: i64,
    pub payment_form: String,
    pub currency: Currency,
    pub penalty_clause: Option<String>,
    pub notes: Option<String>,
}

impl ContractDraft {
    /// Returns every constraint the draft violates, empty when valid.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.conditions.trim().is_empty() {
            violations.push("conditions must not be empty".to_string());
        }
        if self.start_date > self.end_date {
            violations.push("start_date must not be after end_date".to_string());
        }
        if self.total_value_minor <= 0 {
            violations.push("total value must be > 0".to_string());
        }
        if self.payment_form.trim().is_empty() {
            violations.push("payment form must not be empty".to_string());
        }
        violations
    }
}

impl Contract {
    pub fn new(draft: &ContractDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: draft.project_id,
            conditions: draft.conditions.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            total_value_minor: draft.total_value_minor,
            payment_form: draft.payment_form.clone(),
            currency: draft.currency,
            penalty_clause: draft.penalty_clause.clone(),
            notes: draft.notes.clone(),
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub conditions: String,
    pub start_date: Date,
    pub end_date: Date,
    pub total_value_minor: i64,
    pub payment_form: String,
    pub currency: String,
    pub penalty_clause: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
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

impl From<&Contract> for ActiveModel {
    fn from(contract: &Contract) -> Self {
        Self {
            id: ActiveValue::Set(contract.id.to_string()),
            project_id: ActiveValue::Set(contract.project_id.to_string()),
            conditions: ActiveValue::Set(contract.conditions.clone()),
            start_date: ActiveValue::Set(contract.start_date),
            end_date: ActiveValue::Set(contract.end_date),
            total_value_minor: ActiveValue::Set(contract.total_value_minor),
            payment_form: ActiveValue::Set(contract.payment_form.clone()),
            currency: ActiveValue::Set(contract.currency.code().to_string()),
            penalty_clause: ActiveValue::Set(contract.penalty_clause.clone()),
            notes: ActiveValue::Set(contract.notes.clone()),
            created_at: ActiveValue::Set(contract.created_at),
        }
    }
}

impl TryFrom<Model> for Contract {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "contract")?,
            project_id: parse_uuid(&model.project_id, "project")?,
            conditions: model.conditions,
            start_date: model.start_date,
            end_date: model.end_date,
            total_value_minor: model.total_value_minor,
            payment_form: model.payment_form,
            currency: Currency::try_from(model.currency.as_str())?,
            penalty_clause: model.penalty_clause,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ContractDraft {
        ContractDraft {
            project_id: Uuid::new_v4(),
            conditions: "50% anticipo, 50% contra entrega".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            total_value_minor: 1_000_000,
            payment_form: "transferencia".to_string(),
            currency: Currency::Cop,
            penalty_clause: None,
            notes: None,
        }
    }

    #[test]
    fn valid_draft_has_no_violations() {
        assert!(draft().violations().is_empty());
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let mut bad = draft();
        bad.end_date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            bad.violations(),
            vec!["start_date must not be after end_date".to_string()]
        );
    }

    #[test]
    fn non_positive_value_is_rejected() {
        let mut bad = draft();
        bad.total_value_minor = 0;
        assert_eq!(bad.violations().len(), 1);
    }
}
