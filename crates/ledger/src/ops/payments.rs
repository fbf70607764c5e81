use chrono::NaiveDate;
use sea_orm::{
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    LedgerError, Payment, PaymentKind, PaymentMode, ResultLedger, expenses, payments,
};

use super::{Ledger, Page, normalize_optional_text, with_tx};

#[derive(Clone, Debug)]
pub struct CreatePaymentCmd {
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub party_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
    pub kind: PaymentKind,
    pub mode: PaymentMode,
    pub amount_minor: i64,
    pub payment_date: NaiveDate,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

/// Date bounds are half-open: `[from, to)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaymentListFilter {
    pub party_id: Option<Uuid>,
    pub kind: Option<PaymentKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Ledger {
    /// Records a payment. When it settles an expense, the expense must live
    /// in the same organization and project, and the payment's party (if
    /// any) must match the expense's party.
    pub async fn new_payment(&self, user_id: &str, cmd: CreatePaymentCmd) -> ResultLedger<Payment> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, cmd.org_id, user_id).await?;
            self.require_project_in_org(&db_tx, cmd.org_id, cmd.project_id)
                .await?;
            if let Some(party_id) = cmd.party_id {
                self.require_party_in_org(&db_tx, cmd.org_id, party_id)
                    .await?;
            }
            if let Some(expense_id) = cmd.expense_id {
                let expense_model = expenses::Entity::find_by_id(expense_id.to_string())
                    .filter(expenses::Column::OrgId.eq(cmd.org_id.to_string()))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| LedgerError::NotFound("expense not exists".to_string()))?;
                if expense_model.project_id != cmd.project_id.to_string() {
                    return Err(LedgerError::Validation(
                        "expense belongs to a different project".to_string(),
                    ));
                }
                if let Some(party_id) = cmd.party_id
                    && expense_model.party_id.as_deref() != Some(party_id.to_string().as_str())
                {
                    return Err(LedgerError::Validation(
                        "payment party does not match the expense party".to_string(),
                    ));
                }
            }

            let payment = Payment::new(
                cmd.org_id,
                cmd.project_id,
                cmd.party_id,
                cmd.expense_id,
                Some(user_id.to_string()),
                cmd.kind,
                cmd.mode,
                cmd.amount_minor,
                cmd.payment_date,
                normalize_optional_text(cmd.reference_number.as_deref()),
                normalize_optional_text(cmd.notes.as_deref()),
            )?;
            payments::ActiveModel::from(&payment).insert(&db_tx).await?;
            Ok(payment)
        })
    }

    pub async fn payment(
        &self,
        org_id: Uuid,
        payment_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Payment> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            let model = payments::Entity::find_by_id(payment_id.to_string())
                .filter(payments::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("payment not exists".to_string()))?;
            Payment::try_from(model)
        })
    }

    /// Payments of a project, newest first. Returns the page of rows and the
    /// unpaged total.
    pub async fn payments(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        filter: PaymentListFilter,
        page: Page,
    ) -> ResultLedger<(Vec<Payment>, u64)> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let mut query = payments::Entity::find()
                .filter(payments::Column::OrgId.eq(org_id.to_string()))
                .filter(payments::Column::ProjectId.eq(project_id.to_string()));
            if let Some(party_id) = filter.party_id {
                query = query.filter(payments::Column::PartyId.eq(party_id.to_string()));
            }
            if let Some(kind) = filter.kind {
                query = query.filter(payments::Column::Kind.eq(kind.as_str()));
            }
            if let Some(from) = filter.from {
                query = query.filter(payments::Column::PaymentDate.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(payments::Column::PaymentDate.lt(to));
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(payments::Column::PaymentDate)
                .offset(page.offset())
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            let rows = models
                .into_iter()
                .map(Payment::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            Ok((rows, total))
        })
    }

    /// Payments are immutable; a wrong payment is deleted and re-recorded.
    pub async fn delete_payment(
        &self,
        org_id: Uuid,
        payment_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = payments::Entity::find_by_id(payment_id.to_string())
                .filter(payments::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("payment not exists".to_string()))?;

            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
