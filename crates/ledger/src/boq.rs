//! Bill-of-quantities (BOQ) line items.
//!
//! Budget lines share the expense arithmetic: the line amount is derived
//! from `rate × quantity` and never persisted.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger, money};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoqItem {
    pub id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    /// Measurement unit label, e.g. "m³" or "bag".
    pub unit: String,
    pub rate_minor: i64,
    pub quantity_milli: i64,
    /// Derived `rate × quantity`; recomputed on every load, never persisted.
    pub amount_minor: i64,
}

impl BoqItem {
    pub fn new(
        org_id: Uuid,
        project_id: Uuid,
        name: String,
        unit: String,
        rate_minor: i64,
        quantity_milli: i64,
    ) -> ResultLedger<Self> {
        let amount_minor = money::amount_from_rate(rate_minor, quantity_milli)?;
        Ok(Self {
            id: Uuid::new_v4(),
            org_id,
            project_id,
            name,
            unit,
            rate_minor,
            quantity_milli,
            amount_minor,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "boq_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub name: String,
    pub unit: String,
    pub rate_minor: i64,
    pub quantity_milli: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BoqItem> for ActiveModel {
    fn from(item: &BoqItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            org_id: ActiveValue::Set(item.org_id.to_string()),
            project_id: ActiveValue::Set(item.project_id.to_string()),
            name: ActiveValue::Set(item.name.clone()),
            unit: ActiveValue::Set(item.unit.clone()),
            rate_minor: ActiveValue::Set(item.rate_minor),
            quantity_milli: ActiveValue::Set(item.quantity_milli),
        }
    }
}

impl TryFrom<Model> for BoqItem {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        let amount_minor = money::amount_from_rate(model.rate_minor, model.quantity_milli)?;
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("boq item not exists".to_string()))?,
            org_id: Uuid::parse_str(&model.org_id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            project_id: Uuid::parse_str(&model.project_id)
                .map_err(|_| LedgerError::NotFound("project not exists".to_string()))?,
            name: model.name,
            unit: model.unit,
            rate_minor: model.rate_minor,
            quantity_milli: model.quantity_milli,
            amount_minor,
        })
    }
}
