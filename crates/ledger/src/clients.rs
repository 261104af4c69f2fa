//! Client directory entries.
//!
//! The ledger only needs clients as the owner side of project lookups; the
//! HTTP surface for managing them lives in the server crate.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    Empresa,
    Independiente,
}

impl ClientKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empresa => "empresa",
            Self::Independiente => "independiente",
        }
    }
}

impl TryFrom<&str> for ClientKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "empresa" => Ok(Self::Empresa),
            "independiente" => Ok(Self::Independiente),
            other => Err(LedgerError::Validation(format!(
                "invalid client kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub kind: ClientKind,
    pub created_at: DateTime<Utc>,
}

/// Input shape for a new client, validated before persistence.
#[derive(Clone, Debug, Deserialize)]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub kind: ClientKind,
}

impl ClientDraft {
    /// Returns every constraint the draft violates, empty when valid.
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.name.chars().count() < 3 {
            violations.push("name must be at least 3 characters".to_string());
        }
        if !self.email.contains('@') {
            violations.push("email must be a valid address".to_string());
        }
        if self.phone.chars().count() < 7 {
            violations.push("phone must be at least 7 characters".to_string());
        }
        violations
    }
}

impl Client {
    pub fn new(draft: &ClientDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            kind: draft.kind,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub kind: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::projects::Entity")]
    Projects,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Client> for ActiveModel {
    fn from(client: &Client) -> Self {
        Self {
            id: ActiveValue::Set(client.id.to_string()),
            name: ActiveValue::Set(client.name.clone()),
            email: ActiveValue::Set(client.email.clone()),
            phone: ActiveValue::Set(client.phone.clone()),
            kind: ActiveValue::Set(client.kind.as_str().to_string()),
            created_at: ActiveValue::Set(client.created_at),
        }
    }
}

impl TryFrom<Model> for Client {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "client")?,
            name: model.name,
            email: model.email,
            phone: model.phone,
            kind: ClientKind::try_from(model.kind.as_str())?,
            created_at: model.created_at,
        })
    }
}
