//! Expense primitives.
//!
//! An expense records a cost against a project, optionally owed to a party
//! and attributed to a stage. The amount is **always** derived from
//! `rate × quantity` through [`money::amount_from_rate`]; it is carried on
//! the domain struct for convenience but never persisted.
//!
//! [`money::amount_from_rate`]: crate::money::amount_from_rate

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, PaymentMode, ResultLedger, money};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Approved,
}

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
        }
    }
}

impl TryFrom<&str> for ExpenseStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            other => Err(LedgerError::Validation(format!(
                "invalid expense status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    /// Party this cost is owed to, if any.
    pub party_id: Option<Uuid>,
    pub stage_id: Option<Uuid>,
    pub category_id: Uuid,
    /// Unit rate in minor units.
    pub rate_minor: i64,
    /// Quantity in thousandths of a unit.
    pub quantity_milli: i64,
    /// Derived `rate × quantity`; recomputed on every load, never persisted.
    pub amount_minor: i64,
    pub mode: PaymentMode,
    pub expense_date: NaiveDate,
    pub status: ExpenseStatus,
}

impl Expense {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        org_id: Uuid,
        project_id: Uuid,
        party_id: Option<Uuid>,
        stage_id: Option<Uuid>,
        category_id: Uuid,
        rate_minor: i64,
        quantity_milli: i64,
        mode: PaymentMode,
        expense_date: NaiveDate,
    ) -> ResultLedger<Self> {
        let amount_minor = money::amount_from_rate(rate_minor, quantity_milli)?;
        Ok(Self {
            id: Uuid::new_v4(),
            org_id,
            project_id,
            party_id,
            stage_id,
            category_id,
            rate_minor,
            quantity_milli,
            amount_minor,
            mode,
            expense_date,
            status: ExpenseStatus::Pending,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub party_id: Option<String>,
    pub stage_id: Option<String>,
    pub category_id: String,
    pub rate_minor: i64,
    pub quantity_milli: i64,
    pub mode: String,
    pub expense_date: Date,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            org_id: ActiveValue::Set(expense.org_id.to_string()),
            project_id: ActiveValue::Set(expense.project_id.to_string()),
            party_id: ActiveValue::Set(expense.party_id.map(|id| id.to_string())),
            stage_id: ActiveValue::Set(expense.stage_id.map(|id| id.to_string())),
            category_id: ActiveValue::Set(expense.category_id.to_string()),
            rate_minor: ActiveValue::Set(expense.rate_minor),
            quantity_milli: ActiveValue::Set(expense.quantity_milli),
            mode: ActiveValue::Set(expense.mode.as_str().to_string()),
            expense_date: ActiveValue::Set(expense.expense_date),
            status: ActiveValue::Set(expense.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        let amount_minor = money::amount_from_rate(model.rate_minor, model.quantity_milli)?;
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("expense not exists".to_string()))?,
            org_id: Uuid::parse_str(&model.org_id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            project_id: Uuid::parse_str(&model.project_id)
                .map_err(|_| LedgerError::NotFound("project not exists".to_string()))?,
            party_id: model.party_id.and_then(|s| Uuid::parse_str(&s).ok()),
            stage_id: model.stage_id.and_then(|s| Uuid::parse_str(&s).ok()),
            category_id: Uuid::parse_str(&model.category_id)
                .map_err(|_| LedgerError::NotFound("category not exists".to_string()))?,
            rate_minor: model.rate_minor,
            quantity_milli: model.quantity_milli,
            amount_minor,
            mode: PaymentMode::try_from(model.mode.as_str())?,
            expense_date: model.expense_date,
            status: ExpenseStatus::try_from(model.status.as_str())?,
        })
    }
}
