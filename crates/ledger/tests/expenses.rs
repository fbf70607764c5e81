use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use ledger::{
    CreateExpenseCmd, CreatePaymentCmd, ExpenseListFilter, ImmediatePayment, Ledger, LedgerError,
    OrgRole, Page, PaymentKind, PaymentListFilter, PaymentMode,
};
use migration::MigratorTrait;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let ledger = Ledger::builder().database(db.clone()).build().await.unwrap();
    (ledger, db)
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
}

/// Org + project + category owned by alice.
async fn site_fixture(ledger: &Ledger) -> (Uuid, Uuid, Uuid) {
    let org = ledger.new_organization("Bluegate Builders", "alice").await.unwrap();
    let project = ledger
        .new_project(org.id, "alice", "Lakeside Villa", 1_000_000, date(1), None, None)
        .await
        .unwrap();
    let category = ledger.new_category(org.id, "alice", "Cement").await.unwrap();
    (org.id, project.id, category.id)
}

fn expense_cmd(org_id: Uuid, project_id: Uuid, category_id: Uuid) -> CreateExpenseCmd {
    CreateExpenseCmd {
        org_id,
        project_id,
        party_id: None,
        stage_id: None,
        category_id,
        rate_minor: 45_000,
        quantity_milli: 10_000,
        mode: PaymentMode::Cash,
        expense_date: date(3),
        immediate_payment: None,
    }
}

#[tokio::test]
async fn expense_amount_is_derived_from_rate_and_quantity() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;

    // 450.00 per bag × 10 bags
    let (expense, payment) = ledger
        .new_expense("alice", expense_cmd(org_id, project_id, category_id))
        .await
        .unwrap();
    assert_eq!(expense.amount_minor, 450_000);
    assert!(payment.is_none());

    let reloaded = ledger.expense(org_id, expense.id, "alice").await.unwrap();
    assert_eq!(reloaded.amount_minor, 450_000);
}

#[tokio::test]
async fn immediate_payment_lands_with_the_expense() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;
    let party = ledger
        .new_party(org_id, "alice", "Steel & Sons", None, None, ledger::PartyKind::Vendor)
        .await
        .unwrap();

    let mut cmd = expense_cmd(org_id, project_id, category_id);
    cmd.party_id = Some(party.id);
    cmd.immediate_payment = Some(ImmediatePayment {
        amount_minor: 200_000,
        mode: PaymentMode::Online,
        reference_number: Some("TXN-77".to_string()),
        notes: None,
    });

    let (expense, payment) = ledger.new_expense("alice", cmd).await.unwrap();
    let payment = payment.unwrap();
    assert_eq!(payment.kind, PaymentKind::Out);
    assert_eq!(payment.expense_id, Some(expense.id));
    assert_eq!(payment.party_id, Some(party.id));

    let outstanding = ledger
        .party_outstanding(org_id, project_id, party.id, "alice")
        .await
        .unwrap();
    assert_eq!(outstanding, 250_000);
}

#[tokio::test]
async fn oversized_immediate_payment_persists_nothing() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;

    let mut cmd = expense_cmd(org_id, project_id, category_id);
    cmd.immediate_payment = Some(ImmediatePayment {
        amount_minor: 999_999_999,
        mode: PaymentMode::Cash,
        reference_number: None,
        notes: None,
    });

    let err = ledger.new_expense("alice", cmd).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let (rows, total) = ledger
        .expenses(org_id, project_id, "alice", ExpenseListFilter::default(), Page::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);
    let (payments, _) = ledger
        .payments(org_id, project_id, "alice", PaymentListFilter::default(), Page::default())
        .await
        .unwrap();
    assert!(payments.is_empty());
}

#[tokio::test]
async fn approval_is_one_way() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;
    let (expense, _) = ledger
        .new_expense("alice", expense_cmd(org_id, project_id, category_id))
        .await
        .unwrap();

    let approved = ledger
        .approve_expense(org_id, expense.id, "alice")
        .await
        .unwrap();
    assert_eq!(approved.status, ledger::ExpenseStatus::Approved);

    let err = ledger
        .approve_expense(org_id, expense.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn expense_with_linked_payment_cannot_be_deleted() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;
    let (expense, _) = ledger
        .new_expense("alice", expense_cmd(org_id, project_id, category_id))
        .await
        .unwrap();
    let payment = ledger
        .new_payment(
            "alice",
            CreatePaymentCmd {
                org_id,
                project_id,
                party_id: None,
                expense_id: Some(expense.id),
                kind: PaymentKind::Out,
                mode: PaymentMode::Cash,
                amount_minor: 100_000,
                payment_date: date(4),
                reference_number: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let err = ledger
        .delete_expense(org_id, expense.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    ledger.delete_payment(org_id, payment.id, "alice").await.unwrap();
    ledger.delete_expense(org_id, expense.id, "alice").await.unwrap();
}

#[tokio::test]
async fn payment_against_foreign_project_expense_is_rejected() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;
    let other_project = ledger
        .new_project(org_id, "alice", "Hill House", 500_000, date(1), None, None)
        .await
        .unwrap();
    let (expense, _) = ledger
        .new_expense("alice", expense_cmd(org_id, project_id, category_id))
        .await
        .unwrap();

    let err = ledger
        .new_payment(
            "alice",
            CreatePaymentCmd {
                org_id,
                project_id: other_project.id,
                party_id: None,
                expense_id: Some(expense.id),
                kind: PaymentKind::Out,
                mode: PaymentMode::Cash,
                amount_minor: 1_000,
                payment_date: date(5),
                reference_number: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn client_receipt_may_reference_the_client_party() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;
    let client = ledger
        .new_party(org_id, "alice", "Lakeside Homeowner", None, None, ledger::PartyKind::Client)
        .await
        .unwrap();

    // An IN receipt carries the client party it came from.
    let receipt = ledger
        .new_payment(
            "alice",
            CreatePaymentCmd {
                org_id,
                project_id,
                party_id: Some(client.id),
                expense_id: None,
                kind: PaymentKind::In,
                mode: PaymentMode::Online,
                amount_minor: 250_000,
                payment_date: date(6),
                reference_number: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(receipt.party_id, Some(client.id));

    // Settling an expense stays OUT-only.
    let (expense, _) = ledger
        .new_expense("alice", expense_cmd(org_id, project_id, category_id))
        .await
        .unwrap();
    let err = ledger
        .new_payment(
            "alice",
            CreatePaymentCmd {
                org_id,
                project_id,
                party_id: None,
                expense_id: Some(expense.id),
                kind: PaymentKind::In,
                mode: PaymentMode::Online,
                amount_minor: 1_000,
                payment_date: date(7),
                reference_number: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn organizations_are_isolated_between_users() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;

    let err = ledger
        .expenses(org_id, project_id, "bob", ExpenseListFilter::default(), Page::default())
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::NotFound("organization not exists".to_string()));

    let err = ledger
        .new_expense("bob", expense_cmd(org_id, project_id, category_id))
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::NotFound("organization not exists".to_string()));
}

#[tokio::test]
async fn viewers_can_read_but_not_write() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;
    ledger
        .upsert_member(org_id, "alice", "bob", OrgRole::Viewer)
        .await
        .unwrap();

    let (rows, _) = ledger
        .expenses(org_id, project_id, "bob", ExpenseListFilter::default(), Page::default())
        .await
        .unwrap();
    assert!(rows.is_empty());

    let err = ledger
        .new_expense("bob", expense_cmd(org_id, project_id, category_id))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden(_)));
}

#[tokio::test]
async fn category_names_are_unique_per_org() {
    let (ledger, _db) = ledger_with_db().await;
    let org = ledger.new_organization("Bluegate Builders", "alice").await.unwrap();
    ledger.new_category(org.id, "alice", "Cement").await.unwrap();

    let err = ledger
        .new_category(org.id, "alice", "  cement ")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyExists(_)));

    // Same name in another org is fine.
    let other = ledger.new_organization("Redbrick Co", "alice").await.unwrap();
    ledger.new_category(other.id, "alice", "Cement").await.unwrap();
}

#[tokio::test]
async fn date_filters_are_half_open() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;

    for day in [3, 10, 17] {
        let mut cmd = expense_cmd(org_id, project_id, category_id);
        cmd.expense_date = date(day);
        ledger.new_expense("alice", cmd).await.unwrap();
    }

    let filter = ExpenseListFilter {
        from: Some(date(3)),
        to: Some(date(17)),
        ..Default::default()
    };
    let (rows, total) = ledger
        .expenses(org_id, project_id, "alice", filter, Page::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(rows.iter().all(|e| e.expense_date < date(17)));
}

#[tokio::test]
async fn deleting_a_project_removes_its_ledger_rows() {
    let (ledger, _db) = ledger_with_db().await;
    let (org_id, project_id, category_id) = site_fixture(&ledger).await;
    ledger
        .new_expense("alice", expense_cmd(org_id, project_id, category_id))
        .await
        .unwrap();
    ledger
        .new_payment(
            "alice",
            CreatePaymentCmd {
                org_id,
                project_id,
                party_id: None,
                expense_id: None,
                kind: PaymentKind::In,
                mode: PaymentMode::Online,
                amount_minor: 700_000,
                payment_date: date(2),
                reference_number: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    ledger.delete_project(org_id, project_id, "alice").await.unwrap();

    let err = ledger.project(org_id, project_id, "alice").await.unwrap_err();
    assert_eq!(err, LedgerError::NotFound("project not exists".to_string()));
    // The category survives; it is org-level.
    let categories = ledger.categories(org_id, "alice").await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, category_id);
}
