//! Pure ledger aggregation.
//!
//! Every derived financial figure the system displays is folded here from
//! pre-filtered row sets. The functions are stateless, perform no I/O, and
//! are total over their input domain: empty inputs yield zero-valued
//! summaries, never errors. Callers are responsible for passing rows that
//! are already scoped to one organization (and project/party/member where
//! the operation implies it); no tenant check happens here.
//!
//! Balances are raw signed values. A party that has been overpaid comes out
//! negative and must not be clamped here; flooring for display is a
//! presentation concern.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Expense, MemberAdvance, Party, PartyKind, Payment, PaymentKind};

/// Outstanding balance of one party on one project:
/// `sum of expense amounts - sum of OUT payment amounts`.
///
/// `payments_out` is expected to contain only OUT payments for the party;
/// anything else is skipped defensively by kind.
pub fn party_outstanding(expenses: &[Expense], payments_out: &[Payment]) -> i64 {
    let expensed: i64 = expenses.iter().map(|e| e.amount_minor).sum();
    let paid: i64 = payments_out
        .iter()
        .filter(|p| p.kind == PaymentKind::Out)
        .map(|p| p.amount_minor)
        .sum();
    expensed - paid
}

/// One expense with the portion not yet settled by linked OUT payments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpaidExpense {
    pub expense: Expense,
    pub unpaid_minor: i64,
}

/// Expenses that still have an unpaid portion, for "pay against" selection.
///
/// For each expense, OUT payments whose `expense_id` matches are summed and
/// subtracted from the expense amount. Fully settled (or over-settled)
/// expenses are excluded so they cannot be paid twice. An expense with no
/// linked payments is unpaid in full.
pub fn unpaid_expenses(expenses: &[Expense], payments_out: &[Payment]) -> Vec<UnpaidExpense> {
    let mut paid_by_expense: HashMap<Uuid, i64> = HashMap::new();
    for payment in payments_out {
        if payment.kind != PaymentKind::Out {
            continue;
        }
        if let Some(expense_id) = payment.expense_id {
            *paid_by_expense.entry(expense_id).or_insert(0) += payment.amount_minor;
        }
    }

    expenses
        .iter()
        .filter_map(|expense| {
            let paid = paid_by_expense.get(&expense.id).copied().unwrap_or(0);
            let unpaid_minor = expense.amount_minor - paid;
            (unpaid_minor > 0).then(|| UnpaidExpense {
                expense: expense.clone(),
                unpaid_minor,
            })
        })
        .collect()
}

/// Aggregate of one expense category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Display-only; empty when the category row is unknown.
    pub name: String,
    pub total_minor: i64,
    pub count: u64,
}

/// Groups expenses by category id.
///
/// Partition property: the bucket totals sum to the total of all expense
/// amounts; no row is dropped or double-counted. Map iteration order is not
/// meaningful.
pub fn expenses_by_category(
    expenses: &[Expense],
    names: &HashMap<Uuid, String>,
) -> HashMap<Uuid, CategoryTotal> {
    let mut buckets: HashMap<Uuid, CategoryTotal> = HashMap::new();
    for expense in expenses {
        let bucket = buckets
            .entry(expense.category_id)
            .or_insert_with(|| CategoryTotal {
                name: names.get(&expense.category_id).cloned().unwrap_or_default(),
                total_minor: 0,
                count: 0,
            });
        bucket.total_minor += expense.amount_minor;
        bucket.count += 1;
    }
    buckets
}

/// Advance position of one member on one project.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceSummary {
    pub total_advanced_minor: i64,
    pub balance_minor: i64,
}

/// `total advanced - spent`.
///
/// The spent figure is supplied by the caller; this function never invents a
/// spending source. There is no expense-to-advance link in the schema today,
/// so callers currently pass 0 (see `DESIGN.md`).
pub fn member_advance_summary(advances: &[MemberAdvance], spent_minor: i64) -> AdvanceSummary {
    let total_advanced_minor: i64 = advances.iter().map(|a| a.amount_minor).sum();
    AdvanceSummary {
        total_advanced_minor,
        balance_minor: total_advanced_minor - spent_minor,
    }
}

/// Project-level cash position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPaymentSummary {
    pub total_expenses_minor: i64,
    pub total_in_minor: i64,
    pub total_out_minor: i64,
    /// `total_in - total_expenses`: what the project received from the
    /// client minus what it has spent. Not the same thing as party
    /// outstanding, which nets expenses against vendor payments.
    pub balance_minor: i64,
}

pub fn project_payment_summary(
    expenses: &[Expense],
    payments_in: &[Payment],
    payments_out: &[Payment],
) -> ProjectPaymentSummary {
    let total_expenses_minor: i64 = expenses.iter().map(|e| e.amount_minor).sum();
    let total_in_minor: i64 = payments_in
        .iter()
        .filter(|p| p.kind == PaymentKind::In)
        .map(|p| p.amount_minor)
        .sum();
    let total_out_minor: i64 = payments_out
        .iter()
        .filter(|p| p.kind == PaymentKind::Out)
        .map(|p| p.amount_minor)
        .sum();
    ProjectPaymentSummary {
        total_expenses_minor,
        total_in_minor,
        total_out_minor,
        balance_minor: total_in_minor - total_expenses_minor,
    }
}

/// The rows of one party, pre-grouped by the caller.
#[derive(Clone, Debug)]
pub struct PartyAccount {
    pub party: Party,
    pub expenses: Vec<Expense>,
    pub payments_out: Vec<Payment>,
}

/// One party-kind bucket of the credits summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditsBucket {
    pub count: u64,
    /// Raw signed sum of per-party outstanding balances; negatives
    /// (overpaid parties) reduce the bucket.
    pub balance_minor: i64,
}

impl CreditsBucket {
    fn add(&mut self, outstanding_minor: i64) {
        self.count += 1;
        self.balance_minor += outstanding_minor;
    }
}

/// Credit overview across the payable party kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditsSummary {
    pub vendors: CreditsBucket,
    pub labours: CreditsBucket,
    pub subcontractors: CreditsBucket,
    pub total_minor: i64,
}

/// Applies [`party_outstanding`] per account and sums raw signed balances
/// into per-kind buckets. CLIENT parties are skipped: client money is
/// tracked through IN payments, not vendor credit.
pub fn credits_summary(accounts: &[PartyAccount]) -> CreditsSummary {
    let mut summary = CreditsSummary::default();
    for account in accounts {
        let outstanding = party_outstanding(&account.expenses, &account.payments_out);
        match account.party.kind {
            PartyKind::Vendor => summary.vendors.add(outstanding),
            PartyKind::Labour => summary.labours.add(outstanding),
            PartyKind::Subcontractor => summary.subcontractors.add(outstanding),
            PartyKind::Client => continue,
        }
        summary.total_minor += outstanding;
    }
    summary
}

/// Percentage `part / whole × 100`, with 0% substituted for a zero
/// denominator (never NaN or infinity).
pub fn ratio_percent(part_minor: i64, whole_minor: i64) -> f64 {
    if whole_minor == 0 {
        return 0.0;
    }
    (part_minor as f64 / whole_minor as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{ExpenseStatus, PaymentMode};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn expense(org: Uuid, project: Uuid, party: Option<Uuid>, rate: i64, qty_milli: i64) -> Expense {
        Expense::new(
            org,
            project,
            party,
            None,
            Uuid::new_v4(),
            rate,
            qty_milli,
            PaymentMode::Cash,
            date(),
        )
        .unwrap()
    }

    fn payment_out(
        org: Uuid,
        project: Uuid,
        party: Option<Uuid>,
        expense_id: Option<Uuid>,
        amount: i64,
    ) -> Payment {
        Payment::new(
            org,
            project,
            party,
            expense_id,
            None,
            PaymentKind::Out,
            PaymentMode::Cash,
            amount,
            date(),
            None,
            None,
        )
        .unwrap()
    }

    fn payment_in(org: Uuid, project: Uuid, amount: i64) -> Payment {
        Payment::new(
            org,
            project,
            None,
            None,
            None,
            PaymentKind::In,
            PaymentMode::Online,
            amount,
            date(),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn outstanding_is_expenses_minus_payments() {
        let (org, project, party) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let expenses = vec![
            expense(org, project, Some(party), 100, 2000),
            expense(org, project, Some(party), 50, 1000),
        ];
        let payments = vec![payment_out(org, project, Some(party), None, 150)];

        assert_eq!(party_outstanding(&expenses, &payments), 100);
    }

    #[test]
    fn outstanding_of_empty_inputs_is_zero() {
        assert_eq!(party_outstanding(&[], &[]), 0);
    }

    #[test]
    fn overpaid_party_stays_negative() {
        let (org, project, party) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let expenses = vec![expense(org, project, Some(party), 1000, 1000)];
        let payments = vec![payment_out(org, project, Some(party), None, 1200)];

        assert_eq!(party_outstanding(&expenses, &payments), -200);
    }

    #[test]
    fn outstanding_is_idempotent() {
        let (org, project, party) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let expenses = vec![expense(org, project, Some(party), 700, 3000)];
        let payments = vec![payment_out(org, project, Some(party), None, 600)];

        let first = party_outstanding(&expenses, &payments);
        let second = party_outstanding(&expenses, &payments);
        assert_eq!(first, second);
    }

    #[test]
    fn unpaid_expenses_tracks_partial_settlement() {
        // Expenses 100×2 (=200) and 50×1 (=50); 150 paid against the first.
        let (org, project, party) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let first = expense(org, project, Some(party), 10000, 2000);
        let second = expense(org, project, Some(party), 5000, 1000);
        let payments = vec![payment_out(org, project, Some(party), Some(first.id), 15000)];

        let unpaid = unpaid_expenses(&[first.clone(), second.clone()], &payments);
        assert_eq!(unpaid.len(), 2);
        assert_eq!(unpaid[0].expense.id, first.id);
        assert_eq!(unpaid[0].unpaid_minor, 5000);
        assert_eq!(unpaid[1].expense.id, second.id);
        assert_eq!(unpaid[1].unpaid_minor, 5000);
    }

    #[test]
    fn fully_paid_expenses_are_excluded() {
        let (org, project, party) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let settled = expense(org, project, Some(party), 100, 1000);
        let open = expense(org, project, Some(party), 200, 1000);
        let payments = vec![payment_out(org, project, Some(party), Some(settled.id), 100)];

        let unpaid = unpaid_expenses(&[settled, open.clone()], &payments);
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].expense.id, open.id);
        assert_eq!(unpaid[0].unpaid_minor, 200);
    }

    #[test]
    fn expense_without_payments_is_unpaid_in_full() {
        let (org, project) = (Uuid::new_v4(), Uuid::new_v4());
        let lone = expense(org, project, None, 330, 1000);

        let unpaid = unpaid_expenses(&[lone.clone()], &[]);
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].unpaid_minor, lone.amount_minor);
    }

    #[test]
    fn category_buckets_partition_the_total() {
        let (org, project) = (Uuid::new_v4(), Uuid::new_v4());
        let cat_a = Uuid::new_v4();
        let cat_b = Uuid::new_v4();
        let mut rows = vec![
            expense(org, project, None, 100, 1000),
            expense(org, project, None, 250, 2000),
            expense(org, project, None, 75, 4000),
        ];
        rows[0].category_id = cat_a;
        rows[1].category_id = cat_a;
        rows[2].category_id = cat_b;

        let names = HashMap::from([(cat_a, "Cement".to_string())]);
        let buckets = expenses_by_category(&rows, &names);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&cat_a].name, "Cement");
        assert_eq!(buckets[&cat_a].count, 2);
        assert_eq!(buckets[&cat_b].name, "");
        assert_eq!(buckets[&cat_b].count, 1);

        let bucket_total: i64 = buckets.values().map(|b| b.total_minor).sum();
        let row_total: i64 = rows.iter().map(|e| e.amount_minor).sum();
        assert_eq!(bucket_total, row_total);
    }

    #[test]
    fn advance_summary_subtracts_caller_supplied_spent() {
        let (org, project) = (Uuid::new_v4(), Uuid::new_v4());
        let advances = vec![
            MemberAdvance::new(
                org,
                project,
                "mara".to_string(),
                5000,
                "site diesel".to_string(),
                PaymentMode::Cash,
                date(),
                None,
                None,
            )
            .unwrap(),
            MemberAdvance::new(
                org,
                project,
                "mara".to_string(),
                2500,
                "hardware run".to_string(),
                PaymentMode::Online,
                date(),
                None,
                None,
            )
            .unwrap(),
        ];

        let summary = member_advance_summary(&advances, 3000);
        assert_eq!(summary.total_advanced_minor, 7500);
        assert_eq!(summary.balance_minor, 4500);

        let untouched = member_advance_summary(&advances, 0);
        assert_eq!(untouched.balance_minor, 7500);
    }

    #[test]
    fn project_payment_summary_of_empty_inputs_is_all_zero() {
        assert_eq!(
            project_payment_summary(&[], &[], &[]),
            ProjectPaymentSummary::default()
        );
    }

    #[test]
    fn project_balance_is_receipts_minus_expenses() {
        let (org, project) = (Uuid::new_v4(), Uuid::new_v4());
        let expenses = vec![expense(org, project, None, 400, 1000)];
        let ins = vec![payment_in(org, project, 1000)];
        let outs = vec![payment_out(org, project, None, None, 250)];

        let summary = project_payment_summary(&expenses, &ins, &outs);
        assert_eq!(summary.total_expenses_minor, 400);
        assert_eq!(summary.total_in_minor, 1000);
        assert_eq!(summary.total_out_minor, 250);
        assert_eq!(summary.balance_minor, 600);
    }

    #[test]
    fn credits_buckets_keep_raw_signed_sums() {
        // Two vendors with balances 500 and -100 → bucket 400, count 2.
        let (org, project) = (Uuid::new_v4(), Uuid::new_v4());
        let vendor = |name: &str| {
            Party::new(org, name.to_string(), None, None, PartyKind::Vendor)
        };
        let a = vendor("Steel & Sons");
        let b = vendor("Gravel Bros");

        let accounts = vec![
            PartyAccount {
                party: a.clone(),
                expenses: vec![expense(org, project, Some(a.id), 500, 1000)],
                payments_out: vec![],
            },
            PartyAccount {
                party: b.clone(),
                expenses: vec![],
                payments_out: vec![payment_out(org, project, Some(b.id), None, 100)],
            },
        ];

        let summary = credits_summary(&accounts);
        assert_eq!(summary.vendors.count, 2);
        assert_eq!(summary.vendors.balance_minor, 400);
        assert_eq!(summary.labours, CreditsBucket::default());
        assert_eq!(summary.subcontractors, CreditsBucket::default());
        assert_eq!(summary.total_minor, 400);
    }

    #[test]
    fn client_parties_do_not_enter_credit_buckets() {
        let org = Uuid::new_v4();
        let client = Party::new(org, "Acme Homes".to_string(), None, None, PartyKind::Client);
        let accounts = vec![PartyAccount {
            party: client,
            expenses: vec![],
            payments_out: vec![],
        }];

        assert_eq!(credits_summary(&accounts), CreditsSummary::default());
    }

    #[test]
    fn ratio_percent_guards_zero_denominator() {
        assert_eq!(ratio_percent(500, 0), 0.0);
        assert_eq!(ratio_percent(0, 0), 0.0);
        assert!((ratio_percent(250, 1000) - 25.0).abs() < f64::EPSILON);
    }
}
