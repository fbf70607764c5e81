//! Payment primitives.
//!
//! A payment is money moving in (`IN`, received from a client) or out
//! (`OUT`, paid to a party, optionally against one specific expense).
//! Payments are never mutated after creation; corrections are delete +
//! re-create.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    In,
    Out,
}

impl PaymentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

impl TryFrom<&str> for PaymentKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            other => Err(LedgerError::Validation(format!(
                "invalid payment kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Cash,
    Cheque,
    Online,
}

impl PaymentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Cheque => "CHEQUE",
            Self::Online => "ONLINE",
        }
    }
}

impl TryFrom<&str> for PaymentMode {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "CASH" => Ok(Self::Cash),
            "CHEQUE" => Ok(Self::Cheque),
            "ONLINE" => Ok(Self::Online),
            other => Err(LedgerError::Validation(format!(
                "invalid payment mode: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub party_id: Option<Uuid>,
    /// When set (OUT only), this payment settles part of that expense.
    pub expense_id: Option<Uuid>,
    /// Username of whoever recorded the payment.
    pub recorded_by: Option<String>,
    pub kind: PaymentKind,
    pub mode: PaymentMode,
    pub amount_minor: i64,
    pub payment_date: NaiveDate,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

impl Payment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        org_id: Uuid,
        project_id: Uuid,
        party_id: Option<Uuid>,
        expense_id: Option<Uuid>,
        recorded_by: Option<String>,
        kind: PaymentKind,
        mode: PaymentMode,
        amount_minor: i64,
        payment_date: NaiveDate,
        reference_number: Option<String>,
        notes: Option<String>,
    ) -> ResultLedger<Self> {
        if amount_minor <= 0 {
            return Err(LedgerError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if expense_id.is_some() && kind != PaymentKind::Out {
            return Err(LedgerError::Validation(
                "only OUT payments may settle an expense".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            org_id,
            project_id,
            party_id,
            expense_id,
            recorded_by,
            kind,
            mode,
            amount_minor,
            payment_date,
            reference_number,
            notes,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub party_id: Option<String>,
    pub expense_id: Option<String>,
    pub recorded_by: Option<String>,
    pub kind: String,
    pub mode: String,
    pub amount_minor: i64,
    pub payment_date: Date,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            org_id: ActiveValue::Set(payment.org_id.to_string()),
            project_id: ActiveValue::Set(payment.project_id.to_string()),
            party_id: ActiveValue::Set(payment.party_id.map(|id| id.to_string())),
            expense_id: ActiveValue::Set(payment.expense_id.map(|id| id.to_string())),
            recorded_by: ActiveValue::Set(payment.recorded_by.clone()),
            kind: ActiveValue::Set(payment.kind.as_str().to_string()),
            mode: ActiveValue::Set(payment.mode.as_str().to_string()),
            amount_minor: ActiveValue::Set(payment.amount_minor),
            payment_date: ActiveValue::Set(payment.payment_date),
            reference_number: ActiveValue::Set(payment.reference_number.clone()),
            notes: ActiveValue::Set(payment.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("payment not exists".to_string()))?,
            org_id: Uuid::parse_str(&model.org_id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            project_id: Uuid::parse_str(&model.project_id)
                .map_err(|_| LedgerError::NotFound("project not exists".to_string()))?,
            party_id: model.party_id.and_then(|s| Uuid::parse_str(&s).ok()),
            expense_id: model.expense_id.and_then(|s| Uuid::parse_str(&s).ok()),
            recorded_by: model.recorded_by,
            kind: PaymentKind::try_from(model.kind.as_str())?,
            mode: PaymentMode::try_from(model.mode.as_str())?,
            amount_minor: model.amount_minor,
            payment_date: model.payment_date,
            reference_number: model.reference_number,
            notes: model.notes,
        })
    }
}
