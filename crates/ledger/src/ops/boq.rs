use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{BoqItem, LedgerError, ResultLedger, boq, money};

use super::{Ledger, normalize_required_name, with_tx};

impl Ledger {
    pub async fn new_boq_item(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        name: &str,
        unit: &str,
        rate_minor: i64,
        quantity_milli: i64,
    ) -> ResultLedger<BoqItem> {
        let name = normalize_required_name(name, "boq item")?;
        let unit = normalize_required_name(unit, "boq unit")?;

        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let item = BoqItem::new(org_id, project_id, name, unit, rate_minor, quantity_milli)?;
            boq::ActiveModel::from(&item).insert(&db_tx).await?;
            Ok(item)
        })
    }

    pub async fn boq_items(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Vec<BoqItem>> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let models = boq::Entity::find()
                .filter(boq::Column::ProjectId.eq(project_id.to_string()))
                .order_by_asc(boq::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(BoqItem::try_from).collect()
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_boq_item(
        &self,
        org_id: Uuid,
        item_id: Uuid,
        user_id: &str,
        name: Option<&str>,
        unit: Option<&str>,
        rate_minor: Option<i64>,
        quantity_milli: Option<i64>,
    ) -> ResultLedger<BoqItem> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = boq::Entity::find_by_id(item_id.to_string())
                .filter(boq::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("boq item not exists".to_string()))?;
            let mut item = BoqItem::try_from(model)?;

            if let Some(name) = name {
                item.name = normalize_required_name(name, "boq item")?;
            }
            if let Some(unit) = unit {
                item.unit = normalize_required_name(unit, "boq unit")?;
            }
            if let Some(rate) = rate_minor {
                item.rate_minor = rate;
            }
            if let Some(quantity) = quantity_milli {
                item.quantity_milli = quantity;
            }
            item.amount_minor = money::amount_from_rate(item.rate_minor, item.quantity_milli)?;

            let mut active = boq::ActiveModel::from(&item);
            active.id = ActiveValue::Unchanged(item.id.to_string());
            active.update(&db_tx).await?;
            Ok(item)
        })
    }

    pub async fn delete_boq_item(
        &self,
        org_id: Uuid,
        item_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = boq::Entity::find_by_id(item_id.to_string())
                .filter(boq::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("boq item not exists".to_string()))?;

            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
