use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use clients::{Client, ClientDraft, ClientKind};
pub use contracts::{Contract, ContractDraft};
pub use currency::Currency;
pub use error::LedgerError;
pub use movements::{Movement, MovementDraft, MovementKind};
pub use projects::{Project, ProjectDraft, ProjectState};

mod clients;
mod contracts;
mod currency;
mod error;
mod movements;
mod projects;
mod util;

type ResultLedger<T> = Result<T, LedgerError>;

/// Derived income/expense totals for one contract or project.
///
/// Totals are recomputed from the movements collection on every call;
/// nothing is cached or stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
}

impl Balance {
    /// Income minus expense.
    #[must_use]
    pub const fn net_minor(self) -> i64 {
        self.total_income_minor - self.total_expense_minor
    }
}

/// Balance of a single project, with the contract it was derived through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBalance {
    pub project_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub balance: Balance,
}

/// One row of a per-client balance query: a project of that client with its
/// contract face value (0 when the project has no contract) and totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: Uuid,
    pub project_name: String,
    pub contract_value_minor: i64,
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    pub net_minor: i64,
}

/// One movement joined with its project name for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRow {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub kind: MovementKind,
    pub description: String,
    pub amount_minor: i64,
    pub project_name: Option<String>,
}

/// Per-project totals over a date range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRangeSummary {
    pub project_id: Uuid,
    pub project_name: Option<String>,
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    pub net_minor: i64,
}

/// The financial ledger engine.
///
/// Records income/expense movements against a project's contract, enforces
/// the contract ceilings and derives aggregated balances. The store handle
/// is injected at construction; the engine keeps no other state.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
}

impl Ledger {
    /// Return a builder for `Ledger`.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Record an income (`ingreso`) movement for a project.
    ///
    /// When the project has a contract, the cumulative income recorded
    /// under that contract plus `amount_minor` must not exceed the contract
    /// face value; otherwise [`LedgerError::BalanceExceeded`] is returned
    /// and nothing is persisted.
    pub async fn record_income(
        &self,
        project_id: Uuid,
        amount_minor: i64,
        description: &str,
    ) -> ResultLedger<Uuid> {
        let draft = MovementDraft {
            project_id,
            amount_minor,
            description: description.to_string(),
        };
        self.record_movement(MovementKind::Income, draft).await
    }

    /// Record an expense (`egreso`) movement for a project.
    ///
    /// When the project has a contract, the cumulative expense recorded
    /// under that contract plus `amount_minor` must not exceed the
    /// cumulative income already collected.
    pub async fn record_expense(
        &self,
        project_id: Uuid,
        amount_minor: i64,
        description: &str,
    ) -> ResultLedger<Uuid> {
        let draft = MovementDraft {
            project_id,
            amount_minor,
            description: description.to_string(),
        };
        self.record_movement(MovementKind::Expense, draft).await
    }

    async fn record_movement(&self, kind: MovementKind, draft: MovementDraft) -> ResultLedger<Uuid> {
        let violations = draft.violations();
        if !violations.is_empty() {
            return Err(LedgerError::Validation(violations.join(", ")));
        }

        // The ceiling sums and the insert must observe one consistent
        // ledger state: without the transaction two concurrent recordings
        // against the same contract could both pass the check and jointly
        // overshoot the ceiling. Early returns drop the transaction, which
        // rolls it back.
        let db_tx = self.database.begin().await?;

        projects::Entity::find_by_id(draft.project_id.to_string())
            .one(&db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound("project not exists".to_string()))?;

        let contract_model = contracts::Entity::find()
            .filter(contracts::Column::ProjectId.eq(draft.project_id.to_string()))
            .one(&db_tx)
            .await?;

        // Resolved once here; historical movements recorded before a
        // contract existed keep a NULL contract reference forever.
        let contract_id = match contract_model {
            Some(model) => {
                let contract = Contract::try_from(model)?;
                let available = match kind {
                    MovementKind::Income => {
                        let income =
                            sum_by_contract(&db_tx, contract.id, MovementKind::Income).await?;
                        contract.total_value_minor - income
                    }
                    MovementKind::Expense => {
                        let income =
                            sum_by_contract(&db_tx, contract.id, MovementKind::Income).await?;
                        let expense =
                            sum_by_contract(&db_tx, contract.id, MovementKind::Expense).await?;
                        income - expense
                    }
                };
                if draft.amount_minor > available {
                    return Err(LedgerError::BalanceExceeded(match kind {
                        MovementKind::Income => format!(
                            "income exceeds the remaining contract value, available: {available}"
                        ),
                        MovementKind::Expense => format!(
                            "expense exceeds the collected project balance, available: {available}"
                        ),
                    }));
                }
                Some(contract.id)
            }
            None => None,
        };

        let movement = Movement::new(
            draft.project_id,
            contract_id,
            kind,
            draft.description,
            draft.amount_minor,
            Utc::now(),
        )?;
        movements::ActiveModel::from(&movement).insert(&db_tx).await?;

        db_tx.commit().await?;
        Ok(movement.id)
    }

    /// Sum all income and expense movements recorded under a contract.
    ///
    /// A kind with no movements sums to 0.
    pub async fn balance_for_contract(&self, contract_id: Uuid) -> ResultLedger<Balance> {
        let total_income_minor =
            sum_by_contract(&self.database, contract_id, MovementKind::Income).await?;
        let total_expense_minor =
            sum_by_contract(&self.database, contract_id, MovementKind::Expense).await?;
        Ok(Balance {
            total_income_minor,
            total_expense_minor,
        })
    }

    /// Balance of a project, derived through its contract when one exists.
    ///
    /// A project without a contract still reports the totals of its
    /// contract-less movements, which are never ceiling-checked.
    pub async fn balance_for_project(&self, project_id: Uuid) -> ResultLedger<ProjectBalance> {
        self.project(project_id).await?;

        let contract = self.contract_for_project(project_id).await?;
        let balance = match &contract {
            Some(contract) => self.balance_for_contract(contract.id).await?,
            None => Balance {
                total_income_minor: sum_uncontracted(
                    &self.database,
                    project_id,
                    MovementKind::Income,
                )
                .await?,
                total_expense_minor: sum_uncontracted(
                    &self.database,
                    project_id,
                    MovementKind::Expense,
                )
                .await?,
            },
        };

        Ok(ProjectBalance {
            project_id,
            contract_id: contract.map(|contract| contract.id),
            balance,
        })
    }

    /// One summary row per project owned by the client, in project-lookup
    /// order.
    pub async fn balance_for_client(&self, client_id: Uuid) -> ResultLedger<Vec<ProjectSummary>> {
        self.client(client_id).await?;

        let project_models = projects::Entity::find()
            .filter(projects::Column::ClientId.eq(client_id.to_string()))
            .all(&self.database)
            .await?;

        let mut summaries = Vec::with_capacity(project_models.len());
        for model in project_models {
            let project = Project::try_from(model)?;
            let contract = self.contract_for_project(project.id).await?;
            let (contract_value_minor, balance) = match &contract {
                Some(contract) => (
                    contract.total_value_minor,
                    self.balance_for_contract(contract.id).await?,
                ),
                None => (
                    0,
                    Balance {
                        total_income_minor: sum_uncontracted(
                            &self.database,
                            project.id,
                            MovementKind::Income,
                        )
                        .await?,
                        total_expense_minor: sum_uncontracted(
                            &self.database,
                            project.id,
                            MovementKind::Expense,
                        )
                        .await?,
                    },
                ),
            };
            summaries.push(ProjectSummary {
                project_id: project.id,
                project_name: project.name,
                contract_value_minor,
                total_income_minor: balance.total_income_minor,
                total_expense_minor: balance.total_expense_minor,
                net_minor: balance.net_minor(),
            });
        }
        Ok(summaries)
    }

    /// Every movement across all projects joined with the project name,
    /// newest first.
    pub async fn list_movements(&self) -> ResultLedger<Vec<MovementRow>> {
        let rows: Vec<(movements::Model, Option<projects::Model>)> = movements::Entity::find()
            .find_also_related(projects::Entity)
            .order_by_desc(movements::Column::OccurredAt)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (movement_model, project_model) in rows {
            let movement = Movement::try_from(movement_model)?;
            out.push(MovementRow {
                id: movement.id,
                occurred_at: movement.occurred_at,
                kind: movement.kind,
                description: movement.description,
                amount_minor: movement.amount_minor,
                project_name: project_model.map(|project| project.name),
            });
        }
        Ok(out)
    }

    /// Per-project totals for movements whose timestamp falls on any of the
    /// calendar days in `[start, end]`.
    ///
    /// Both endpoint days are fully inclusive: the filter spans from
    /// `start` at midnight up to but excluding midnight of the day after
    /// `end`. A range that matches no movement yields
    /// [`LedgerError::EmptyRange`], which callers may treat as a warning
    /// rather than a failure.
    pub async fn range_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultLedger<Vec<ProjectRangeSummary>> {
        if start > end {
            return Err(LedgerError::Validation(
                "invalid date range: start is after end".to_string(),
            ));
        }
        let lower = start.and_time(NaiveTime::MIN).and_utc();
        let upper = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| LedgerError::Validation("invalid end date".to_string()))?
            .and_time(NaiveTime::MIN)
            .and_utc();

        let rows = movements::Entity::find()
            .filter(movements::Column::OccurredAt.gte(lower))
            .filter(movements::Column::OccurredAt.lt(upper))
            .all(&self.database)
            .await?;

        if rows.is_empty() {
            return Err(LedgerError::EmptyRange(format!(
                "no financial movements between {start} and {end}"
            )));
        }

        let mut totals: HashMap<Uuid, (i64, i64)> = HashMap::new();
        for model in rows {
            let movement = Movement::try_from(model)?;
            let entry = totals.entry(movement.project_id).or_insert((0, 0));
            match movement.kind {
                MovementKind::Income => entry.0 += movement.amount_minor,
                MovementKind::Expense => entry.1 += movement.amount_minor,
            }
        }

        let ids: Vec<String> = totals.keys().map(|id| id.to_string()).collect();
        let project_models = projects::Entity::find()
            .filter(projects::Column::Id.is_in(ids))
            .all(&self.database)
            .await?;
        let mut names: HashMap<Uuid, String> = HashMap::with_capacity(project_models.len());
        for model in project_models {
            names.insert(util::parse_uuid(&model.id, "project")?, model.name);
        }

        let mut out: Vec<ProjectRangeSummary> = totals
            .into_iter()
            .map(
                |(project_id, (total_income_minor, total_expense_minor))| ProjectRangeSummary {
                    project_id,
                    project_name: names.get(&project_id).cloned(),
                    total_income_minor,
                    total_expense_minor,
                    net_minor: total_income_minor - total_expense_minor,
                },
            )
            .collect();
        out.sort_by(|a, b| a.project_name.cmp(&b.project_name));
        Ok(out)
    }

    /// Range summary over the last 7 calendar days including today.
    pub async fn last_week_summary(&self) -> ResultLedger<Vec<ProjectRangeSummary>> {
        self.trailing_summary(7).await
    }

    /// Range summary over the last 30 calendar days including today.
    pub async fn last_month_summary(&self) -> ResultLedger<Vec<ProjectRangeSummary>> {
        self.trailing_summary(30).await
    }

    async fn trailing_summary(&self, days: u64) -> ResultLedger<Vec<ProjectRangeSummary>> {
        let today = Utc::now().date_naive();
        let start = today
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| LedgerError::Validation("invalid report window".to_string()))?;
        self.range_summary(start, today).await
    }

    /// Add a new client to the directory.
    pub async fn new_client(&self, draft: &ClientDraft) -> ResultLedger<Uuid> {
        let violations = draft.violations();
        if !violations.is_empty() {
            return Err(LedgerError::Validation(violations.join(", ")));
        }
        let client = Client::new(draft, Utc::now());
        clients::ActiveModel::from(&client)
            .insert(&self.database)
            .await?;
        Ok(client.id)
    }

    /// Return a client by id.
    pub async fn client(&self, client_id: Uuid) -> ResultLedger<Client> {
        let model = clients::Entity::find_by_id(client_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound("client not exists".to_string()))?;
        Client::try_from(model)
    }

    /// Add a new project; the owning client must exist.
    pub async fn new_project(&self, draft: &ProjectDraft) -> ResultLedger<Uuid> {
        let violations = draft.violations();
        if !violations.is_empty() {
            return Err(LedgerError::Validation(violations.join(", ")));
        }
        self.client(draft.client_id).await?;

        let project = Project::new(draft, Utc::now());
        projects::ActiveModel::from(&project)
            .insert(&self.database)
            .await?;
        Ok(project.id)
    }

    /// Return a project by id.
    pub async fn project(&self, project_id: Uuid) -> ResultLedger<Project> {
        let model = projects::Entity::find_by_id(project_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound("project not exists".to_string()))?;
        Project::try_from(model)
    }

    /// All projects owned by a client.
    pub async fn projects_for_client(&self, client_id: Uuid) -> ResultLedger<Vec<Project>> {
        let models = projects::Entity::find()
            .filter(projects::Column::ClientId.eq(client_id.to_string()))
            .all(&self.database)
            .await?;
        models.into_iter().map(Project::try_from).collect()
    }

    /// Change a project's state, the only mutation projects support.
    pub async fn set_project_state(
        &self,
        project_id: Uuid,
        state: ProjectState,
    ) -> ResultLedger<()> {
        let model = projects::Entity::find_by_id(project_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound("project not exists".to_string()))?;

        let active = projects::ActiveModel {
            id: ActiveValue::Set(model.id),
            state: ActiveValue::Set(state.as_str().to_string()),
            ..Default::default()
        };
        active.update(&self.database).await?;
        Ok(())
    }

    /// Add a new contract for a project.
    ///
    /// At most one contract may exist per project; the lookup and the
    /// insert run in one transaction so two concurrent creations cannot
    /// both slip through.
    pub async fn new_contract(&self, draft: &ContractDraft) -> ResultLedger<Uuid> {
        let violations = draft.violations();
        if !violations.is_empty() {
            return Err(LedgerError::Validation(violations.join(", ")));
        }

        let db_tx = self.database.begin().await?;

        projects::Entity::find_by_id(draft.project_id.to_string())
            .one(&db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound("project not exists".to_string()))?;

        let existing = contracts::Entity::find()
            .filter(contracts::Column::ProjectId.eq(draft.project_id.to_string()))
            .one(&db_tx)
            .await?;
        if existing.is_some() {
            return Err(LedgerError::AlreadyExists(format!(
                "contract for project {}",
                draft.project_id
            )));
        }

        let contract = Contract::new(draft, Utc::now());
        contracts::ActiveModel::from(&contract).insert(&db_tx).await?;

        db_tx.commit().await?;
        Ok(contract.id)
    }

    /// Return a contract by id.
    pub async fn contract(&self, contract_id: Uuid) -> ResultLedger<Contract> {
        let model = contracts::Entity::find_by_id(contract_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound("contract not exists".to_string()))?;
        Contract::try_from(model)
    }

    /// Resolve the contract associated with a project, if any.
    pub async fn contract_for_project(&self, project_id: Uuid) -> ResultLedger<Option<Contract>> {
        let model = contracts::Entity::find()
            .filter(contracts::Column::ProjectId.eq(project_id.to_string()))
            .one(&self.database)
            .await?;
        model.map(Contract::try_from).transpose()
    }
}

/// Sum of movement amounts of one kind matched by contract reference.
async fn sum_by_contract<C>(
    conn: &C,
    contract_id: Uuid,
    kind: MovementKind,
) -> ResultLedger<i64>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
         FROM movements \
         WHERE contract_id = ? AND kind = ?",
        vec![contract_id.to_string().into(), kind.as_str().into()],
    );
    let row = conn.query_one(stmt).await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}

/// Sum of contract-less movement amounts of one kind for a project.
async fn sum_uncontracted<C>(
    conn: &C,
    project_id: Uuid,
    kind: MovementKind,
) -> ResultLedger<i64>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
         FROM movements \
         WHERE project_id = ? AND contract_id IS NULL AND kind = ?",
        vec![project_id.to_string().into(), kind.as_str().into()],
    );
    let row = conn.query_one(stmt).await?;
    Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
}

/// The builder for `Ledger`.
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`. Balances are derived on demand, so there is no
    /// state to load here.
    pub fn build(self) -> Ledger {
        Ledger {
            database: self.database,
        }
    }
}
