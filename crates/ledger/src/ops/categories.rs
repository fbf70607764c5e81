use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{Category, LedgerError, ResultLedger, categories, expenses};

use super::{Ledger, normalize_required_name, with_tx};

impl Ledger {
    /// Add a new expense category. Names are unique per organization,
    /// case-insensitive.
    pub async fn new_category(
        &self,
        org_id: Uuid,
        user_id: &str,
        name: &str,
    ) -> ResultLedger<Category> {
        let name = normalize_required_name(name, "category")?;

        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;

            let exists = categories::Entity::find()
                .filter(categories::Column::OrgId.eq(org_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(LedgerError::AlreadyExists(name));
            }

            let category = Category::new(org_id, name);
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category)
        })
    }

    pub async fn categories(&self, org_id: Uuid, user_id: &str) -> ResultLedger<Vec<Category>> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;

            let models = categories::Entity::find()
                .filter(categories::Column::OrgId.eq(org_id.to_string()))
                .order_by_asc(categories::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Category::try_from).collect()
        })
    }

    pub async fn rename_category(
        &self,
        org_id: Uuid,
        category_id: Uuid,
        user_id: &str,
        name: &str,
    ) -> ResultLedger<Category> {
        let name = normalize_required_name(name, "category")?;

        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = categories::Entity::find_by_id(category_id.to_string())
                .filter(categories::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("category not exists".to_string()))?;

            let clash = categories::Entity::find()
                .filter(categories::Column::OrgId.eq(org_id.to_string()))
                .filter(categories::Column::Id.ne(category_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if clash {
                return Err(LedgerError::AlreadyExists(name));
            }

            let mut category = Category::try_from(model)?;
            category.name = name;

            let mut active = categories::ActiveModel::from(&category);
            active.id = ActiveValue::Unchanged(category.id.to_string());
            active.update(&db_tx).await?;
            Ok(category)
        })
    }

    /// A category with expenses cannot be deleted; reassign them first.
    pub async fn delete_category(
        &self,
        org_id: Uuid,
        category_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = categories::Entity::find_by_id(category_id.to_string())
                .filter(categories::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("category not exists".to_string()))?;

            let referenced = expenses::Entity::find()
                .filter(expenses::Column::CategoryId.eq(category_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if referenced {
                return Err(LedgerError::Validation(
                    "category is referenced by expenses".to_string(),
                ));
            }

            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
