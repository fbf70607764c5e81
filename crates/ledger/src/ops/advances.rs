use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{LedgerError, MemberAdvance, Patch, PaymentMode, ResultLedger, advances};

use super::{Ledger, Page, normalize_optional_text, normalize_required_name, with_tx};

impl Ledger {
    /// Hands project money to a team member. The member must be a known user
    /// with access to the organization.
    #[allow(clippy::too_many_arguments)]
    pub async fn new_advance(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        member: &str,
        amount_minor: i64,
        purpose: &str,
        mode: PaymentMode,
        advance_date: NaiveDate,
        expected_settlement_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> ResultLedger<MemberAdvance> {
        let purpose = normalize_required_name(purpose, "advance purpose")?;

        with_tx!(self, |db_tx| {
            let org = self.require_org_write(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;
            self.require_user_exists(&db_tx, member).await?;
            if org.owner != member
                && self
                    .org_membership_role(&db_tx, org_id, member)
                    .await?
                    .is_none()
            {
                return Err(LedgerError::Validation(
                    "member does not belong to the organization".to_string(),
                ));
            }

            let advance = MemberAdvance::new(
                org_id,
                project_id,
                member.to_string(),
                amount_minor,
                purpose,
                mode,
                advance_date,
                expected_settlement_date,
                normalize_optional_text(notes),
            )?;
            advances::ActiveModel::from(&advance).insert(&db_tx).await?;
            Ok(advance)
        })
    }

    /// Advances of a project, newest first, optionally for one member.
    /// Returns the page of rows and the unpaged total.
    pub async fn advances(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        member: Option<&str>,
        page: Page,
    ) -> ResultLedger<(Vec<MemberAdvance>, u64)> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let mut query = advances::Entity::find()
                .filter(advances::Column::OrgId.eq(org_id.to_string()))
                .filter(advances::Column::ProjectId.eq(project_id.to_string()));
            if let Some(member) = member {
                query = query.filter(advances::Column::Member.eq(member.to_string()));
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(advances::Column::AdvanceDate)
                .offset(page.offset())
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            let rows = models
                .into_iter()
                .map(MemberAdvance::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            Ok((rows, total))
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_advance(
        &self,
        org_id: Uuid,
        advance_id: Uuid,
        user_id: &str,
        amount_minor: Option<i64>,
        purpose: Option<&str>,
        mode: Option<PaymentMode>,
        advance_date: Option<NaiveDate>,
        expected_settlement_date: Patch<NaiveDate>,
        notes: Patch<String>,
    ) -> ResultLedger<MemberAdvance> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = advances::Entity::find_by_id(advance_id.to_string())
                .filter(advances::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("advance not exists".to_string()))?;
            let mut advance = MemberAdvance::try_from(model)?;

            if let Some(amount) = amount_minor {
                if amount <= 0 {
                    return Err(LedgerError::Validation(
                        "amount_minor must be > 0".to_string(),
                    ));
                }
                advance.amount_minor = amount;
            }
            if let Some(purpose) = purpose {
                advance.purpose = normalize_required_name(purpose, "advance purpose")?;
            }
            if let Some(mode) = mode {
                advance.mode = mode;
            }
            if let Some(date) = advance_date {
                advance.advance_date = date;
            }
            advance.expected_settlement_date =
                expected_settlement_date.apply(advance.expected_settlement_date);
            if let Some(settle) = advance.expected_settlement_date
                && settle < advance.advance_date
            {
                return Err(LedgerError::Validation(
                    "expected_settlement_date must not be before advance_date".to_string(),
                ));
            }
            match notes {
                Patch::Keep => {}
                Patch::Clear => advance.notes = None,
                Patch::Set(value) => advance.notes = normalize_optional_text(Some(&value)),
            }

            let mut active = advances::ActiveModel::from(&advance);
            active.id = ActiveValue::Unchanged(advance.id.to_string());
            active.update(&db_tx).await?;
            Ok(advance)
        })
    }

    pub async fn delete_advance(
        &self,
        org_id: Uuid,
        advance_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = advances::Entity::find_by_id(advance_id.to_string())
                .filter(advances::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("advance not exists".to_string()))?;

            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
