//! DB-facing side of the summary endpoints: fetch org-scoped rows, then
//! delegate every computation to [`crate::summary`].

use std::collections::HashMap;

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Expense, LedgerError, MemberAdvance, Party, Payment, PaymentKind, ResultLedger, advances,
    categories, expenses, parties, payments, projects,
    summary::{
        self, AdvanceSummary, CategoryTotal, CreditsSummary, PartyAccount, ProjectPaymentSummary,
        UnpaidExpense,
    },
};

use super::{Ledger, with_tx};

/// Project cash position together with budget usage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectFinance {
    pub summary: ProjectPaymentSummary,
    pub budget_minor: i64,
    /// `total_expenses / budget × 100`; 0 when the budget is 0.
    pub budget_used_percent: f64,
}

impl Ledger {
    async fn project_expenses(
        &self,
        db: &DatabaseTransaction,
        org_id: Uuid,
        project_id: Uuid,
    ) -> ResultLedger<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::OrgId.eq(org_id.to_string()))
            .filter(expenses::Column::ProjectId.eq(project_id.to_string()))
            .all(db)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    async fn project_payments(
        &self,
        db: &DatabaseTransaction,
        org_id: Uuid,
        project_id: Uuid,
        kind: PaymentKind,
    ) -> ResultLedger<Vec<Payment>> {
        let models = payments::Entity::find()
            .filter(payments::Column::OrgId.eq(org_id.to_string()))
            .filter(payments::Column::ProjectId.eq(project_id.to_string()))
            .filter(payments::Column::Kind.eq(kind.as_str()))
            .all(db)
            .await?;
        models.into_iter().map(Payment::try_from).collect()
    }

    /// Outstanding balance of one party on one project. Raw signed value; an
    /// overpaid party comes out negative.
    pub async fn party_outstanding(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        party_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<i64> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;
            self.require_party_in_org(&db_tx, org_id, party_id).await?;

            let expense_rows = expenses::Entity::find()
                .filter(expenses::Column::OrgId.eq(org_id.to_string()))
                .filter(expenses::Column::ProjectId.eq(project_id.to_string()))
                .filter(expenses::Column::PartyId.eq(party_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Expense::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            let payment_rows = payments::Entity::find()
                .filter(payments::Column::OrgId.eq(org_id.to_string()))
                .filter(payments::Column::ProjectId.eq(project_id.to_string()))
                .filter(payments::Column::PartyId.eq(party_id.to_string()))
                .filter(payments::Column::Kind.eq(PaymentKind::Out.as_str()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Payment::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;

            Ok(summary::party_outstanding(&expense_rows, &payment_rows))
        })
    }

    /// Expenses of a party on a project that still have an unpaid portion.
    pub async fn unpaid_expenses(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        party_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Vec<UnpaidExpense>> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;
            self.require_party_in_org(&db_tx, org_id, party_id).await?;

            let expense_rows = expenses::Entity::find()
                .filter(expenses::Column::OrgId.eq(org_id.to_string()))
                .filter(expenses::Column::ProjectId.eq(project_id.to_string()))
                .filter(expenses::Column::PartyId.eq(party_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Expense::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            let payment_rows = payments::Entity::find()
                .filter(payments::Column::OrgId.eq(org_id.to_string()))
                .filter(payments::Column::ProjectId.eq(project_id.to_string()))
                .filter(payments::Column::Kind.eq(PaymentKind::Out.as_str()))
                .filter(payments::Column::ExpenseId.is_not_null())
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Payment::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;

            Ok(summary::unpaid_expenses(&expense_rows, &payment_rows))
        })
    }

    /// Expense totals of a project grouped by category.
    pub async fn expenses_by_category(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<HashMap<Uuid, CategoryTotal>> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let expense_rows = self.project_expenses(&db_tx, org_id, project_id).await?;

            let mut names = HashMap::new();
            for model in categories::Entity::find()
                .filter(categories::Column::OrgId.eq(org_id.to_string()))
                .all(&db_tx)
                .await?
            {
                let id = Uuid::parse_str(&model.id)
                    .map_err(|_| LedgerError::NotFound("category not exists".to_string()))?;
                names.insert(id, model.name);
            }

            Ok(summary::expenses_by_category(&expense_rows, &names))
        })
    }

    /// Advance position of one member on one project.
    ///
    /// Expenses carry no advance link yet, so nothing is counted as spent
    /// and the balance equals the total advanced.
    pub async fn member_advance_summary(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        member: &str,
        user_id: &str,
    ) -> ResultLedger<AdvanceSummary> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let rows = advances::Entity::find()
                .filter(advances::Column::OrgId.eq(org_id.to_string()))
                .filter(advances::Column::ProjectId.eq(project_id.to_string()))
                .filter(advances::Column::Member.eq(member.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(MemberAdvance::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;

            Ok(summary::member_advance_summary(&rows, 0))
        })
    }

    /// Project cash position and budget usage.
    pub async fn project_finance(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<ProjectFinance> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            let project_model = projects::Entity::find_by_id(project_id.to_string())
                .filter(projects::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("project not exists".to_string()))?;

            let expense_rows = self.project_expenses(&db_tx, org_id, project_id).await?;
            let ins = self
                .project_payments(&db_tx, org_id, project_id, PaymentKind::In)
                .await?;
            let outs = self
                .project_payments(&db_tx, org_id, project_id, PaymentKind::Out)
                .await?;

            let summary = summary::project_payment_summary(&expense_rows, &ins, &outs);
            let budget_used_percent =
                summary::ratio_percent(summary.total_expenses_minor, project_model.budget_minor);
            Ok(ProjectFinance {
                summary,
                budget_minor: project_model.budget_minor,
                budget_used_percent,
            })
        })
    }

    /// Organization-wide credit overview across all projects, bucketed by
    /// party kind.
    pub async fn credits_summary(&self, org_id: Uuid, user_id: &str) -> ResultLedger<CreditsSummary> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;

            let party_rows = parties::Entity::find()
                .filter(parties::Column::OrgId.eq(org_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Party::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;

            let expense_rows = expenses::Entity::find()
                .filter(expenses::Column::OrgId.eq(org_id.to_string()))
                .filter(expenses::Column::PartyId.is_not_null())
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Expense::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            let payment_rows = payments::Entity::find()
                .filter(payments::Column::OrgId.eq(org_id.to_string()))
                .filter(payments::Column::PartyId.is_not_null())
                .filter(payments::Column::Kind.eq(PaymentKind::Out.as_str()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Payment::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;

            let mut expenses_by_party: HashMap<Uuid, Vec<Expense>> = HashMap::new();
            for expense in expense_rows {
                if let Some(party_id) = expense.party_id {
                    expenses_by_party.entry(party_id).or_default().push(expense);
                }
            }
            let mut payments_by_party: HashMap<Uuid, Vec<Payment>> = HashMap::new();
            for payment in payment_rows {
                if let Some(party_id) = payment.party_id {
                    payments_by_party.entry(party_id).or_default().push(payment);
                }
            }

            let accounts: Vec<PartyAccount> = party_rows
                .into_iter()
                .map(|party| PartyAccount {
                    expenses: expenses_by_party.remove(&party.id).unwrap_or_default(),
                    payments_out: payments_by_party.remove(&party.id).unwrap_or_default(),
                    party,
                })
                .collect();

            Ok(summary::credits_summary(&accounts))
        })
    }
}
