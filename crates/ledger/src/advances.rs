//! Member cash advances.
//!
//! Money handed to a team member to spend on project costs. The advance
//! balance is derived by the summary aggregator; the "spent" side of that
//! subtraction is supplied by the caller (see `DESIGN.md`).

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, PaymentMode, ResultLedger};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAdvance {
    pub id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    /// Username of the member who received the money.
    pub member: String,
    pub amount_minor: i64,
    pub purpose: String,
    pub mode: PaymentMode,
    pub advance_date: NaiveDate,
    pub expected_settlement_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl MemberAdvance {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        org_id: Uuid,
        project_id: Uuid,
        member: String,
        amount_minor: i64,
        purpose: String,
        mode: PaymentMode,
        advance_date: NaiveDate,
        expected_settlement_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> ResultLedger<Self> {
        if amount_minor <= 0 {
            return Err(LedgerError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if let Some(settle) = expected_settlement_date
            && settle < advance_date
        {
            return Err(LedgerError::Validation(
                "expected_settlement_date must not be before advance_date".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            org_id,
            project_id,
            member,
            amount_minor,
            purpose,
            mode,
            advance_date,
            expected_settlement_date,
            notes,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "member_advances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub member: String,
    pub amount_minor: i64,
    pub purpose: String,
    pub mode: String,
    pub advance_date: Date,
    pub expected_settlement_date: Option<Date>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&MemberAdvance> for ActiveModel {
    fn from(advance: &MemberAdvance) -> Self {
        Self {
            id: ActiveValue::Set(advance.id.to_string()),
            org_id: ActiveValue::Set(advance.org_id.to_string()),
            project_id: ActiveValue::Set(advance.project_id.to_string()),
            member: ActiveValue::Set(advance.member.clone()),
            amount_minor: ActiveValue::Set(advance.amount_minor),
            purpose: ActiveValue::Set(advance.purpose.clone()),
            mode: ActiveValue::Set(advance.mode.as_str().to_string()),
            advance_date: ActiveValue::Set(advance.advance_date),
            expected_settlement_date: ActiveValue::Set(advance.expected_settlement_date),
            notes: ActiveValue::Set(advance.notes.clone()),
        }
    }
}

impl TryFrom<Model> for MemberAdvance {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("advance not exists".to_string()))?,
            org_id: Uuid::parse_str(&model.org_id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            project_id: Uuid::parse_str(&model.project_id)
                .map_err(|_| LedgerError::NotFound("project not exists".to_string()))?,
            member: model.member,
            amount_minor: model.amount_minor,
            purpose: model.purpose,
            mode: PaymentMode::try_from(model.mode.as_str())?,
            advance_date: model.advance_date,
            expected_settlement_date: model.expected_settlement_date,
            notes: model.notes,
        })
    }
}
