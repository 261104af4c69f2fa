use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Currency code of a contract, serialized as its ISO code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Cop,
    Usd,
    Eur,
}

pub mod client {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ClientKind {
        Empresa,
        Independiente,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientNew {
        pub name: String,
        pub email: String,
        pub phone: String,
        pub kind: ClientKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientCreated {
        pub id: Uuid,
    }
}

pub mod project {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ProjectState {
        Activo,
        Pausado,
        Finalizado,
        Cancelado,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub client_id: Uuid,
        pub name: String,
        pub description: String,
        pub term_days: i32,
        pub state: ProjectState,
        pub proposal_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectStateUpdate {
        pub state: ProjectState,
    }
}

pub mod contract {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContractNew {
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContractCreated {
        pub id: Uuid,
    }
}

pub mod movement {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MovementKind {
        Income,
        Expense,
    }

    /// Body of `POST /income` and `POST /expense`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MovementNew {
        pub project_id: Uuid,
        pub amount_minor: i64,
        pub description: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MovementCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MovementView {
        pub id: Uuid,
        pub occurred_at: DateTime<Utc>,
        pub kind: MovementKind,
        pub description: String,
        pub amount_minor: i64,
        pub project_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MovementListResponse {
        pub movements: Vec<MovementView>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectBalanceResponse {
        pub project_id: Uuid,
        pub contract_id: Option<Uuid>,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectSummaryRow {
        pub project_id: Uuid,
        pub project_name: String,
        pub contract_value_minor: i64,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientBalanceResponse {
        pub client_id: Uuid,
        pub projects: Vec<ProjectSummaryRow>,
    }
}

pub mod report {
    use super::*;

    /// Query string of `GET /reports/range`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RangeQuery {
        pub start: NaiveDate,
        pub end: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectRangeRow {
        pub project_id: Uuid,
        pub project_name: Option<String>,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RangeReportResponse {
        pub projects: Vec<ProjectRangeRow>,
    }
}
