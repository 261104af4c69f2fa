use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use ledger::{
    ClientDraft, ClientKind, ContractDraft, Currency, Ledger, LedgerError, MovementKind,
    ProjectDraft, ProjectState,
};
use migration::MigratorTrait;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder().database(db.clone()).build();
    (ledger, db)
}

async fn seed_client(ledger: &Ledger, name: &str) -> Uuid {
    ledger
        .new_client(&ClientDraft {
            name: name.to_string(),
            email: "contacto@acme.co".to_string(),
            phone: "3001234567".to_string(),
            kind: ClientKind::Empresa,
        })
        .await
        .unwrap()
}

async fn seed_project(ledger: &Ledger, client_id: Uuid, name: &str) -> Uuid {
    ledger
        .new_project(&ProjectDraft {
            client_id,
            name: name.to_string(),
            description: "Sitio corporativo".to_string(),
            term_days: 60,
            state: ProjectState::Activo,
            proposal_id: None,
        })
        .await
        .unwrap()
}

fn contract_draft(project_id: Uuid, total_value_minor: i64) -> ContractDraft {
    ContractDraft {
        project_id,
        conditions: "50% anticipo, 50% contra entrega".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        total_value_minor,
        payment_form: "transferencia".to_string(),
        currency: Currency::Cop,
        penalty_clause: None,
        notes: None,
    }
}

async fn seed_contract(ledger: &Ledger, project_id: Uuid, total_value_minor: i64) -> Uuid {
    ledger
        .new_contract(&contract_draft(project_id, total_value_minor))
        .await
        .unwrap()
}

/// Insert a movement row with a chosen timestamp, bypassing the recorder.
/// Only used to build historical fixtures for range queries.
async fn backdate_movement(
    db: &DatabaseConnection,
    project_id: Uuid,
    kind: MovementKind,
    amount_minor: i64,
    occurred_at: chrono::DateTime<Utc>,
) {
    let kind = match kind {
        MovementKind::Income => "ingreso",
        MovementKind::Expense => "egreso",
    };
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO movements (id, project_id, contract_id, kind, description, amount_minor, occurred_at) \
         VALUES (?, ?, NULL, ?, ?, ?, ?)",
        vec![
            Uuid::new_v4().to_string().into(),
            project_id.to_string().into(),
            kind.into(),
            "Pago histórico".into(),
            amount_minor.into(),
            occurred_at.into(),
        ],
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn income_is_capped_by_contract_value() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;
    let contract_id = seed_contract(&ledger, project_id, 1_000_000).await;

    ledger
        .record_income(project_id, 400_000, "Anticipo inicial")
        .await
        .unwrap();
    let balance = ledger.balance_for_contract(contract_id).await.unwrap();
    assert_eq!(balance.total_income_minor, 400_000);

    // 700_000 > the 600_000 still available on the contract.
    let err = ledger
        .record_income(project_id, 700_000, "Segundo pago")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BalanceExceeded(_)));
    assert_eq!(ledger.list_movements().await.unwrap().len(), 1);

    ledger
        .record_income(project_id, 600_000, "Pago final")
        .await
        .unwrap();
    let balance = ledger.balance_for_contract(contract_id).await.unwrap();
    assert_eq!(balance.total_income_minor, 1_000_000);

    // The contract is now fully funded; nothing more fits.
    let err = ledger
        .record_income(project_id, 1, "Un peso más")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BalanceExceeded(_)));
}

#[tokio::test]
async fn expense_is_capped_by_collected_income() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;
    let contract_id = seed_contract(&ledger, project_id, 1_000_000).await;

    ledger
        .record_income(project_id, 1_000_000, "Pago completo")
        .await
        .unwrap();

    ledger
        .record_expense(project_id, 300_000, "Licencias y hosting")
        .await
        .unwrap();
    let balance = ledger.balance_for_contract(contract_id).await.unwrap();
    assert_eq!(balance.total_expense_minor, 300_000);

    // 800_000 > the 700_000 of income still unspent.
    let err = ledger
        .record_expense(project_id, 800_000, "Subcontrato diseño")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BalanceExceeded(_)));
    assert_eq!(ledger.list_movements().await.unwrap().len(), 2);
    let balance = ledger.balance_for_contract(contract_id).await.unwrap();
    assert_eq!(balance.total_expense_minor, 300_000);
}

#[tokio::test]
async fn expense_without_income_is_rejected_on_contract() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;
    seed_contract(&ledger, project_id, 1_000_000).await;

    let err = ledger
        .record_expense(project_id, 1, "Gasto temprano")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BalanceExceeded(_)));
    assert!(ledger.list_movements().await.unwrap().is_empty());
}

#[tokio::test]
async fn uncontracted_project_has_no_ceiling() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Asesoría suelta").await;

    ledger
        .record_income(project_id, 50, "Pequeño abono")
        .await
        .unwrap();
    // Expense above income: accepted, no contract means no ceiling.
    ledger
        .record_expense(project_id, 200, "Gasto de arranque")
        .await
        .unwrap();

    let balance = ledger.balance_for_project(project_id).await.unwrap();
    assert_eq!(balance.contract_id, None);
    assert_eq!(balance.balance.total_income_minor, 50);
    assert_eq!(balance.balance.total_expense_minor, 200);
    assert_eq!(balance.balance.net_minor(), -150);
}

#[tokio::test]
async fn movements_recorded_before_the_contract_stay_contract_less() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;

    ledger
        .record_income(project_id, 50_000, "Abono informal")
        .await
        .unwrap();

    let contract_id = seed_contract(&ledger, project_id, 100_000).await;

    // The ceiling only counts movements recorded under the contract.
    ledger
        .record_income(project_id, 80_000, "Anticipo contrato")
        .await
        .unwrap();
    let err = ledger
        .record_income(project_id, 30_000, "Sobre el tope")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BalanceExceeded(_)));

    // Project balance is derived through the contract, so the historical
    // contract-less movement is not part of it.
    let balance = ledger.balance_for_project(project_id).await.unwrap();
    assert_eq!(balance.contract_id, Some(contract_id));
    assert_eq!(balance.balance.total_income_minor, 80_000);
}

#[tokio::test]
async fn fresh_contract_sums_to_zero() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;
    let contract_id = seed_contract(&ledger, project_id, 1_000_000).await;

    let balance = ledger.balance_for_contract(contract_id).await.unwrap();
    assert_eq!(balance.total_income_minor, 0);
    assert_eq!(balance.total_expense_minor, 0);
}

#[tokio::test]
async fn invalid_drafts_are_rejected_before_any_write() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;

    let err = ledger
        .record_income(project_id, 0, "Monto nulo")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = ledger
        .record_income(project_id, 1_000, "pago")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    assert!(ledger.list_movements().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let (ledger, _db) = ledger_with_db().await;

    let err = ledger
        .record_income(Uuid::new_v4(), 1_000, "Proyecto fantasma")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    let err = ledger.balance_for_project(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn only_one_contract_per_project() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;
    seed_contract(&ledger, project_id, 1_000_000).await;

    let err = ledger
        .new_contract(&contract_draft(project_id, 500_000))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyExists(_)));
}

#[tokio::test]
async fn contract_draft_with_inverted_dates_is_rejected() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;

    let mut draft = contract_draft(project_id, 1_000_000);
    draft.start_date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let err = ledger.new_contract(&draft).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn client_balance_reports_only_that_clients_projects() {
    let (ledger, _db) = ledger_with_db().await;

    let alice = seed_client(&ledger, "Estudio Alicia").await;
    let bob = seed_client(&ledger, "Taller Roberto").await;
    let alice_project = seed_project(&ledger, alice, "Rediseño web").await;
    let bob_project = seed_project(&ledger, bob, "Campaña digital").await;
    seed_contract(&ledger, alice_project, 1_000_000).await;
    seed_contract(&ledger, bob_project, 2_000_000).await;

    ledger
        .record_income(alice_project, 400_000, "Anticipo inicial")
        .await
        .unwrap();
    ledger
        .record_expense(alice_project, 100_000, "Licencias y hosting")
        .await
        .unwrap();
    ledger
        .record_income(bob_project, 999_999, "Pago de Roberto")
        .await
        .unwrap();

    let rows = ledger.balance_for_client(alice).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.project_name, "Rediseño web");
    assert_eq!(row.contract_value_minor, 1_000_000);
    assert_eq!(row.total_income_minor, 400_000);
    assert_eq!(row.total_expense_minor, 100_000);
    assert_eq!(row.net_minor, 300_000);
}

#[tokio::test]
async fn client_balance_includes_uncontracted_projects() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Asesoría suelta").await;

    ledger
        .record_income(project_id, 50, "Pequeño abono")
        .await
        .unwrap();
    ledger
        .record_expense(project_id, 200, "Gasto de arranque")
        .await
        .unwrap();

    let rows = ledger.balance_for_client(client_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].contract_value_minor, 0);
    assert_eq!(rows[0].total_income_minor, 50);
    assert_eq!(rows[0].total_expense_minor, 200);
    assert_eq!(rows[0].net_minor, -150);
}

#[tokio::test]
async fn unknown_client_balance_is_not_found() {
    let (ledger, _db) = ledger_with_db().await;
    let err = ledger.balance_for_client(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn list_movements_is_newest_first_with_project_names() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;
    seed_contract(&ledger, project_id, 1_000_000).await;

    ledger
        .record_income(project_id, 400_000, "Anticipo inicial")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    ledger
        .record_expense(project_id, 100_000, "Licencias y hosting")
        .await
        .unwrap();

    let rows = ledger.list_movements().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].kind, MovementKind::Expense);
    assert_eq!(rows[1].kind, MovementKind::Income);
    assert!(rows[0].occurred_at >= rows[1].occurred_at);
    assert_eq!(rows[0].project_name.as_deref(), Some("Rediseño web"));
}

#[tokio::test]
async fn range_summary_respects_day_boundaries() {
    let (ledger, db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;

    let inside = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 0).unwrap();
    backdate_movement(&db, project_id, MovementKind::Income, 1_000, inside).await;

    let day = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let rows = ledger.range_summary(day, day).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].project_id, project_id);
    assert_eq!(rows[0].total_income_minor, 1_000);
    assert_eq!(rows[0].project_name.as_deref(), Some("Rediseño web"));

    // One day off on either side must not match.
    let before = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
    let err = ledger
        .range_summary(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), before)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::EmptyRange(_)));

    let after = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
    let err = ledger
        .range_summary(after, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::EmptyRange(_)));
}

#[tokio::test]
async fn range_summary_groups_by_project_and_kind() {
    let (ledger, db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let first = seed_project(&ledger, client_id, "Rediseño web").await;
    let second = seed_project(&ledger, client_id, "Campaña digital").await;

    let when = Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap();
    backdate_movement(&db, first, MovementKind::Income, 5_000, when).await;
    backdate_movement(&db, first, MovementKind::Expense, 2_000, when).await;
    backdate_movement(&db, second, MovementKind::Income, 7_000, when).await;

    let rows = ledger
        .range_summary(
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let first_row = rows
        .iter()
        .find(|row| row.project_id == first)
        .expect("first project missing from summary");
    assert_eq!(first_row.total_income_minor, 5_000);
    assert_eq!(first_row.total_expense_minor, 2_000);
    assert_eq!(first_row.net_minor, 3_000);

    let second_row = rows
        .iter()
        .find(|row| row.project_id == second)
        .expect("second project missing from summary");
    assert_eq!(second_row.total_income_minor, 7_000);
    assert_eq!(second_row.total_expense_minor, 0);
}

#[tokio::test]
async fn inverted_range_is_a_validation_error() {
    let (ledger, _db) = ledger_with_db().await;
    let err = ledger
        .range_summary(
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn trailing_summaries_cover_recent_movements() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;

    ledger
        .record_income(project_id, 9_000, "Pago reciente")
        .await
        .unwrap();

    let rows = ledger.last_week_summary().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_income_minor, 9_000);

    let rows = ledger.last_month_summary().await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn project_state_is_the_only_mutation() {
    let (ledger, _db) = ledger_with_db().await;
    let client_id = seed_client(&ledger, "Acme Estudio").await;
    let project_id = seed_project(&ledger, client_id, "Rediseño web").await;

    ledger
        .set_project_state(project_id, ProjectState::Pausado)
        .await
        .unwrap();
    let project = ledger.project(project_id).await.unwrap();
    assert_eq!(project.state, ProjectState::Pausado);
    assert_eq!(project.name, "Rediseño web");

    let err = ledger
        .set_project_state(Uuid::new_v4(), ProjectState::Cancelado)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn project_requires_existing_client() {
    let (ledger, _db) = ledger_with_db().await;
    let err = ledger
        .new_project(&ProjectDraft {
            client_id: Uuid::new_v4(),
            name: "Proyecto huérfano".to_string(),
            description: "Sin cliente".to_string(),
            term_days: 10,
            state: ProjectState::Activo,
            proposal_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}
