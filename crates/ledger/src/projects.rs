//! Project directory entries.
//!
//! A project belongs to a client and optionally references the proposal it
//! originated from. After creation the state is the only mutable field; the
//! ledger core otherwise treats projects as read-only context.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    Activo,
    Pausado,
    Finalizado,
    Cancelado,
}

impl ProjectState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "activo",
            Self::Pausado => "pausado",
            Self::Finalizado => "finalizado",
            Self::Cancelado => "cancelado",
        }
    }
}

impl TryFrom<&str> for ProjectState {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "activo" => Ok(Self::Activo),
            "pausado" => Ok(Self::Pausado),
            "finalizado" => Ok(Self::Finalizado),
            "cancelado" => Ok(Self::Cancelado),
            other => Err(LedgerError::Validation(format!(
                "invalid project state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub description: String,
    pub state: ProjectState,
    pub term_days: i32,
    pub proposal_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Input shape for a new project, validated before persistence.
#[derive(Clone, Debug, Deserialize)]
pub struct ProjectDraft {
    pub client_id: Uuid,
    pub name: String,
    pub description: String,
    pub term_days: i32,
    pub state: ProjectState,
    pub proposal_id: Option<Uuid>,
}

impl ProjectDraft {
    /// Returns every constraint the draft violates, empty when valid.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.name.chars().count() < 5 {
            violations.push("name must be at least 5 characters".to_string());
        }
        if self.description.is_empty() {
            violations.push("description must not be empty".to_string());
        }
        if self.term_days < 1 {
            violations.push("term_days must be at least 1".to_string());
        }
        violations
    }
}

impl Project {
    pub fn new(draft: &ProjectDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id: draft.client_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            state: draft.state,
            term_days: draft.term_days,
            proposal_id: draft.proposal_id,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub description: String,
    pub state: String,
    pub term_days: i32,
    pub proposal_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Clients,
    #[sea_orm(has_many = "super::movements::Entity")]
    Movements,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id.to_string()),
            client_id: ActiveValue::Set(project.client_id.to_string()),
            name: ActiveValue::Set(project.name.clone()),
            description: ActiveValue::Set(project.description.clone()),
            state: ActiveValue::Set(project.state.as_str().to_string()),
            term_days: ActiveValue::Set(project.term_days),
            proposal_id: ActiveValue::Set(project.proposal_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(project.created_at),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "project")?,
            client_id: parse_uuid(&model.client_id, "client")?,
            name: model.name,
            description: model.description,
            state: ProjectState::try_from(model.state.as_str())?,
            term_days: model.term_days,
            proposal_id: match model.proposal_id {
                Some(raw) => Some(parse_uuid(&raw, "proposal")?),
                None => None,
            },
            created_at: model.created_at,
        })
    }
}
