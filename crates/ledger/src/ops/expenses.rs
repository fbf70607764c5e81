use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Expense, ExpenseStatus, LedgerError, Patch, Payment, PaymentKind, PaymentMode, ResultLedger,
    expenses, payments,
};

use super::{Ledger, Page, normalize_optional_text, with_tx};

/// Settle (part of) an expense at creation time with a single OUT payment,
/// inserted in the same DB transaction as the expense.
#[derive(Clone, Debug)]
pub struct ImmediatePayment {
    pub amount_minor: i64,
    pub mode: PaymentMode,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub party_id: Option<Uuid>,
    pub stage_id: Option<Uuid>,
    pub category_id: Uuid,
    pub rate_minor: i64,
    pub quantity_milli: i64,
    pub mode: PaymentMode,
    pub expense_date: NaiveDate,
    pub immediate_payment: Option<ImmediatePayment>,
}

/// Date bounds are half-open: `[from, to)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpenseListFilter {
    pub party_id: Option<Uuid>,
    pub stage_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub status: Option<ExpenseStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Ledger {
    /// Records an expense, optionally together with an immediate OUT payment
    /// against it. Either both rows land or neither does.
    pub async fn new_expense(
        &self,
        user_id: &str,
        cmd: CreateExpenseCmd,
    ) -> ResultLedger<(Expense, Option<Payment>)> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, cmd.org_id, user_id).await?;
            self.require_project_in_org(&db_tx, cmd.org_id, cmd.project_id)
                .await?;
            self.require_category_in_org(&db_tx, cmd.org_id, cmd.category_id)
                .await?;
            if let Some(party_id) = cmd.party_id {
                self.require_party_in_org(&db_tx, cmd.org_id, party_id)
                    .await?;
            }
            if let Some(stage_id) = cmd.stage_id {
                self.require_stage_in_org(&db_tx, cmd.org_id, stage_id)
                    .await?;
            }

            let expense = Expense::new(
                cmd.org_id,
                cmd.project_id,
                cmd.party_id,
                cmd.stage_id,
                cmd.category_id,
                cmd.rate_minor,
                cmd.quantity_milli,
                cmd.mode,
                cmd.expense_date,
            )?;
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;

            let payment = match cmd.immediate_payment {
                Some(immediate) => {
                    if immediate.amount_minor > expense.amount_minor {
                        return Err(LedgerError::Validation(
                            "immediate payment exceeds the expense amount".to_string(),
                        ));
                    }
                    let payment = Payment::new(
                        cmd.org_id,
                        cmd.project_id,
                        cmd.party_id,
                        Some(expense.id),
                        Some(user_id.to_string()),
                        PaymentKind::Out,
                        immediate.mode,
                        immediate.amount_minor,
                        cmd.expense_date,
                        normalize_optional_text(immediate.reference_number.as_deref()),
                        normalize_optional_text(immediate.notes.as_deref()),
                    )?;
                    payments::ActiveModel::from(&payment).insert(&db_tx).await?;
                    Some(payment)
                }
                None => None,
            };

            Ok((expense, payment))
        })
    }

    pub async fn expense(
        &self,
        org_id: Uuid,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Expense> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("expense not exists".to_string()))?;
            Expense::try_from(model)
        })
    }

    /// Expenses of a project, newest first. Returns the page of rows and the
    /// unpaged total.
    pub async fn expenses(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        filter: ExpenseListFilter,
        page: Page,
    ) -> ResultLedger<(Vec<Expense>, u64)> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let mut query = expenses::Entity::find()
                .filter(expenses::Column::OrgId.eq(org_id.to_string()))
                .filter(expenses::Column::ProjectId.eq(project_id.to_string()));
            if let Some(party_id) = filter.party_id {
                query = query.filter(expenses::Column::PartyId.eq(party_id.to_string()));
            }
            if let Some(stage_id) = filter.stage_id {
                query = query.filter(expenses::Column::StageId.eq(stage_id.to_string()));
            }
            if let Some(category_id) = filter.category_id {
                query = query.filter(expenses::Column::CategoryId.eq(category_id.to_string()));
            }
            if let Some(status) = filter.status {
                query = query.filter(expenses::Column::Status.eq(status.as_str()));
            }
            if let Some(from) = filter.from {
                query = query.filter(expenses::Column::ExpenseDate.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(expenses::Column::ExpenseDate.lt(to));
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(expenses::Column::ExpenseDate)
                .offset(page.offset())
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            let rows = models
                .into_iter()
                .map(Expense::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            Ok((rows, total))
        })
    }

    /// Updates an expense in place. The amount is re-derived from the
    /// effective rate and quantity; status changes go through
    /// [`approve_expense`](Self::approve_expense).
    #[allow(clippy::too_many_arguments)]
    pub async fn update_expense(
        &self,
        org_id: Uuid,
        expense_id: Uuid,
        user_id: &str,
        party_id: Patch<Uuid>,
        stage_id: Patch<Uuid>,
        category_id: Option<Uuid>,
        rate_minor: Option<i64>,
        quantity_milli: Option<i64>,
        mode: Option<PaymentMode>,
        expense_date: Option<NaiveDate>,
    ) -> ResultLedger<Expense> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("expense not exists".to_string()))?;
            let mut expense = Expense::try_from(model)?;

            if let Patch::Set(party_id) = party_id {
                self.require_party_in_org(&db_tx, org_id, party_id).await?;
            }
            expense.party_id = party_id.apply(expense.party_id);
            if let Patch::Set(stage_id) = stage_id {
                self.require_stage_in_org(&db_tx, org_id, stage_id).await?;
            }
            expense.stage_id = stage_id.apply(expense.stage_id);
            if let Some(category_id) = category_id {
                self.require_category_in_org(&db_tx, org_id, category_id)
                    .await?;
                expense.category_id = category_id;
            }
            if let Some(rate) = rate_minor {
                expense.rate_minor = rate;
            }
            if let Some(quantity) = quantity_milli {
                expense.quantity_milli = quantity;
            }
            expense.amount_minor =
                crate::money::amount_from_rate(expense.rate_minor, expense.quantity_milli)?;
            if let Some(mode) = mode {
                expense.mode = mode;
            }
            if let Some(date) = expense_date {
                expense.expense_date = date;
            }

            let mut active = expenses::ActiveModel::from(&expense);
            active.id = ActiveValue::Unchanged(expense.id.to_string());
            active.update(&db_tx).await?;
            Ok(expense)
        })
    }

    /// PENDING → APPROVED. One-way; approving twice is an error.
    pub async fn approve_expense(
        &self,
        org_id: Uuid,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Expense> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("expense not exists".to_string()))?;
            let mut expense = Expense::try_from(model)?;

            if expense.status == ExpenseStatus::Approved {
                return Err(LedgerError::Validation(
                    "expense already approved".to_string(),
                ));
            }
            expense.status = ExpenseStatus::Approved;

            let active = expenses::ActiveModel {
                id: ActiveValue::Unchanged(expense.id.to_string()),
                status: ActiveValue::Set(expense.status.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(expense)
        })
    }

    /// An expense with linked payments cannot be deleted; delete the
    /// payments first.
    pub async fn delete_expense(
        &self,
        org_id: Uuid,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("expense not exists".to_string()))?;

            let linked = payments::Entity::find()
                .filter(payments::Column::ExpenseId.eq(expense_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if linked {
                return Err(LedgerError::Validation(
                    "expense has linked payments".to_string(),
                ));
            }

            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
