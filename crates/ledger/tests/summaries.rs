use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use ledger::{
    CreateExpenseCmd, CreatePaymentCmd, Ledger, LedgerError, OrgRole, PartyKind, Patch,
    PaymentKind, PaymentMode,
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
    NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
}

struct Site {
    org_id: Uuid,
    project_id: Uuid,
    category_id: Uuid,
}

async fn site_fixture(ledger: &Ledger) -> Site {
    let org = ledger.new_organization("Bluegate Builders", "alice").await.unwrap();
    let project = ledger
        .new_project(org.id, "alice", "Lakeside Villa", 1_000_000, date(1), None, None)
        .await
        .unwrap();
    let category = ledger.new_category(org.id, "alice", "Cement").await.unwrap();
    Site {
        org_id: org.id,
        project_id: project.id,
        category_id: category.id,
    }
}

async fn record_expense(
    ledger: &Ledger,
    site: &Site,
    party_id: Option<Uuid>,
    rate_minor: i64,
    quantity_milli: i64,
) -> Uuid {
    let (expense, _) = ledger
        .new_expense(
            "alice",
            CreateExpenseCmd {
                org_id: site.org_id,
                project_id: site.project_id,
                party_id,
                stage_id: None,
                category_id: site.category_id,
                rate_minor,
                quantity_milli,
                mode: PaymentMode::Cash,
                expense_date: date(5),
                immediate_payment: None,
            },
        )
        .await
        .unwrap();
    expense.id
}

async fn record_payment(
    ledger: &Ledger,
    site: &Site,
    party_id: Option<Uuid>,
    expense_id: Option<Uuid>,
    kind: PaymentKind,
    amount_minor: i64,
) {
    ledger
        .new_payment(
            "alice",
            CreatePaymentCmd {
                org_id: site.org_id,
                project_id: site.project_id,
                party_id,
                expense_id,
                kind,
                mode: PaymentMode::Online,
                amount_minor,
                payment_date: date(10),
                reference_number: None,
                notes: None,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn party_outstanding_nets_payments_against_expenses() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;
    let vendor = ledger
        .new_party(site.org_id, "alice", "Steel & Sons", None, None, PartyKind::Vendor)
        .await
        .unwrap();

    // 200.00 + 50.00 expensed, 150.00 paid.
    record_expense(&ledger, &site, Some(vendor.id), 10_000, 2_000).await;
    record_expense(&ledger, &site, Some(vendor.id), 5_000, 1_000).await;
    record_payment(&ledger, &site, Some(vendor.id), None, PaymentKind::Out, 15_000).await;

    let outstanding = ledger
        .party_outstanding(site.org_id, site.project_id, vendor.id, "alice")
        .await
        .unwrap();
    assert_eq!(outstanding, 10_000);
}

#[tokio::test]
async fn overpaid_party_reports_a_negative_balance() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;
    let vendor = ledger
        .new_party(site.org_id, "alice", "Gravel Bros", None, None, PartyKind::Vendor)
        .await
        .unwrap();

    record_expense(&ledger, &site, Some(vendor.id), 100_000, 1_000).await;
    record_payment(&ledger, &site, Some(vendor.id), None, PaymentKind::Out, 120_000).await;

    let outstanding = ledger
        .party_outstanding(site.org_id, site.project_id, vendor.id, "alice")
        .await
        .unwrap();
    assert_eq!(outstanding, -20_000);
}

#[tokio::test]
async fn unpaid_expenses_exclude_settled_rows() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;
    let vendor = ledger
        .new_party(site.org_id, "alice", "Steel & Sons", None, None, PartyKind::Vendor)
        .await
        .unwrap();

    let first = record_expense(&ledger, &site, Some(vendor.id), 10_000, 2_000).await;
    let second = record_expense(&ledger, &site, Some(vendor.id), 5_000, 1_000).await;
    record_payment(&ledger, &site, Some(vendor.id), Some(first), PaymentKind::Out, 15_000).await;

    let unpaid = ledger
        .unpaid_expenses(site.org_id, site.project_id, vendor.id, "alice")
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 2);
    let first_row = unpaid.iter().find(|u| u.expense.id == first).unwrap();
    assert_eq!(first_row.unpaid_minor, 5_000);
    let second_row = unpaid.iter().find(|u| u.expense.id == second).unwrap();
    assert_eq!(second_row.unpaid_minor, 5_000);

    record_payment(&ledger, &site, Some(vendor.id), Some(first), PaymentKind::Out, 5_000).await;
    let unpaid = ledger
        .unpaid_expenses(site.org_id, site.project_id, vendor.id, "alice")
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 1);
    assert_eq!(unpaid[0].expense.id, second);
}

#[tokio::test]
async fn category_totals_partition_project_spend() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;
    let timber = ledger
        .new_category(site.org_id, "alice", "Timber")
        .await
        .unwrap();

    record_expense(&ledger, &site, None, 10_000, 3_000).await;
    record_expense(&ledger, &site, None, 20_000, 1_000).await;
    let (timber_expense, _) = ledger
        .new_expense(
            "alice",
            CreateExpenseCmd {
                org_id: site.org_id,
                project_id: site.project_id,
                party_id: None,
                stage_id: None,
                category_id: timber.id,
                rate_minor: 7_500,
                quantity_milli: 4_000,
                mode: PaymentMode::Cash,
                expense_date: date(6),
                immediate_payment: None,
            },
        )
        .await
        .unwrap();

    let buckets = ledger
        .expenses_by_category(site.org_id, site.project_id, "alice")
        .await
        .unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[&site.category_id].name, "Cement");
    assert_eq!(buckets[&site.category_id].total_minor, 50_000);
    assert_eq!(buckets[&site.category_id].count, 2);
    assert_eq!(buckets[&timber.id].total_minor, timber_expense.amount_minor);
    assert_eq!(buckets[&timber.id].count, 1);
}

#[tokio::test]
async fn project_finance_tracks_budget_usage() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;

    record_expense(&ledger, &site, None, 125_000, 2_000).await; // 2500.00
    record_payment(&ledger, &site, None, None, PaymentKind::In, 400_000).await;
    record_payment(&ledger, &site, None, None, PaymentKind::Out, 100_000).await;

    let finance = ledger
        .project_finance(site.org_id, site.project_id, "alice")
        .await
        .unwrap();
    assert_eq!(finance.summary.total_expenses_minor, 250_000);
    assert_eq!(finance.summary.total_in_minor, 400_000);
    assert_eq!(finance.summary.total_out_minor, 100_000);
    assert_eq!(finance.summary.balance_minor, 150_000);
    assert_eq!(finance.budget_minor, 1_000_000);
    assert!((finance.budget_used_percent - 25.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn zero_budget_project_reports_zero_percent() {
    let (ledger, _db) = ledger_with_db().await;
    let org = ledger.new_organization("Bluegate Builders", "alice").await.unwrap();
    let project = ledger
        .new_project(org.id, "alice", "Pro Bono Shed", 0, date(1), None, None)
        .await
        .unwrap();

    let finance = ledger
        .project_finance(org.id, project.id, "alice")
        .await
        .unwrap();
    assert_eq!(finance.budget_used_percent, 0.0);
    assert_eq!(finance.summary.total_expenses_minor, 0);
}

#[tokio::test]
async fn credits_summary_buckets_by_party_kind() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;
    let steel = ledger
        .new_party(site.org_id, "alice", "Steel & Sons", None, None, PartyKind::Vendor)
        .await
        .unwrap();
    let gravel = ledger
        .new_party(site.org_id, "alice", "Gravel Bros", None, None, PartyKind::Vendor)
        .await
        .unwrap();
    let crew = ledger
        .new_party(site.org_id, "alice", "Mason Crew", None, None, PartyKind::Labour)
        .await
        .unwrap();
    ledger
        .new_party(site.org_id, "alice", "Acme Homes", None, None, PartyKind::Client)
        .await
        .unwrap();

    // steel: 500.00 owed; gravel: overpaid by 100.00; crew: 300.00 owed.
    record_expense(&ledger, &site, Some(steel.id), 50_000, 1_000).await;
    record_payment(&ledger, &site, Some(gravel.id), None, PaymentKind::Out, 10_000).await;
    record_expense(&ledger, &site, Some(crew.id), 30_000, 1_000).await;

    let credits = ledger.credits_summary(site.org_id, "alice").await.unwrap();
    assert_eq!(credits.vendors.count, 2);
    assert_eq!(credits.vendors.balance_minor, 40_000);
    assert_eq!(credits.labours.count, 1);
    assert_eq!(credits.labours.balance_minor, 30_000);
    assert_eq!(credits.subcontractors.count, 0);
    assert_eq!(credits.total_minor, 70_000);
}

#[tokio::test]
async fn advance_balance_equals_total_advanced() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;
    ledger
        .upsert_member(site.org_id, "alice", "bob", OrgRole::Editor)
        .await
        .unwrap();

    for amount in [50_000, 25_000] {
        ledger
            .new_advance(
                site.org_id,
                site.project_id,
                "alice",
                "bob",
                amount,
                "site diesel",
                PaymentMode::Cash,
                date(8),
                None,
                None,
            )
            .await
            .unwrap();
    }

    let summary = ledger
        .member_advance_summary(site.org_id, site.project_id, "bob", "alice")
        .await
        .unwrap();
    assert_eq!(summary.total_advanced_minor, 75_000);
    assert_eq!(summary.balance_minor, 75_000);
}

#[tokio::test]
async fn advance_update_keeps_settlement_after_advance_date() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;
    ledger
        .upsert_member(site.org_id, "alice", "bob", OrgRole::Editor)
        .await
        .unwrap();
    let advance = ledger
        .new_advance(
            site.org_id,
            site.project_id,
            "alice",
            "bob",
            50_000,
            "site diesel",
            PaymentMode::Cash,
            date(8),
            Some(date(20)),
            None,
        )
        .await
        .unwrap();

    let updated = ledger
        .update_advance(
            site.org_id,
            advance.id,
            "alice",
            Some(60_000),
            None,
            None,
            None,
            Patch::Clear,
            Patch::Set("receipts pending".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 60_000);
    assert_eq!(updated.expected_settlement_date, None);
    assert_eq!(updated.notes.as_deref(), Some("receipts pending"));

    // Moving the advance date past the settlement date must not pass.
    let err = ledger
        .update_advance(
            site.org_id,
            advance.id,
            "alice",
            None,
            None,
            None,
            Some(date(25)),
            Patch::Set(date(10)),
            Patch::Keep,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn summaries_never_cross_organizations() {
    let (ledger, _db) = ledger_with_db().await;
    let site = site_fixture(&ledger).await;
    let vendor = ledger
        .new_party(site.org_id, "alice", "Steel & Sons", None, None, PartyKind::Vendor)
        .await
        .unwrap();
    record_expense(&ledger, &site, Some(vendor.id), 50_000, 1_000).await;

    // bob's own org sees none of alice's rows.
    let bob_org = ledger.new_organization("Redbrick Co", "bob").await.unwrap();
    let credits = ledger.credits_summary(bob_org.id, "bob").await.unwrap();
    assert_eq!(credits.total_minor, 0);
    assert_eq!(credits.vendors.count, 0);

    // And bob cannot query alice's org at all.
    let err = ledger.credits_summary(site.org_id, "bob").await.unwrap_err();
    assert_eq!(
        err,
        ledger::LedgerError::NotFound("organization not exists".to_string())
    );
}
