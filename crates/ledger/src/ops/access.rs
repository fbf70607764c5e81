use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    LedgerError, OrgRole, ResultLedger, categories, expenses, org_memberships, organizations,
    parties, projects, stages, users,
};

use super::Ledger;

/// Generates `_exists_in_org` and `require_in_org` methods for a target
/// entity.
macro_rules! impl_target_in_org {
    ($exists_fn:ident, $require_fn:ident, $entity:path, $org_col:expr, $err_msg:literal) => {
        async fn $exists_fn(
            &self,
            db: &DatabaseTransaction,
            org_id: Uuid,
            target_id: Uuid,
        ) -> ResultLedger<bool> {
            <$entity>::find_by_id(target_id.to_string())
                .filter($org_col.eq(org_id.to_string()))
                .one(db)
                .await
                .map(|model| model.is_some())
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            org_id: Uuid,
            target_id: Uuid,
        ) -> ResultLedger<()> {
            if !self.$exists_fn(db, org_id, target_id).await? {
                return Err(LedgerError::NotFound($err_msg.to_string()));
            }
            Ok(())
        }
    };
}

impl Ledger {
    impl_target_in_org!(
        project_exists_in_org,
        require_project_in_org,
        projects::Entity,
        projects::Column::OrgId,
        "project not exists"
    );

    impl_target_in_org!(
        party_exists_in_org,
        require_party_in_org,
        parties::Entity,
        parties::Column::OrgId,
        "party not exists"
    );

    impl_target_in_org!(
        category_exists_in_org,
        require_category_in_org,
        categories::Entity,
        categories::Column::OrgId,
        "category not exists"
    );

    impl_target_in_org!(
        stage_exists_in_org,
        require_stage_in_org,
        stages::Entity,
        stages::Column::OrgId,
        "stage not exists"
    );

    impl_target_in_org!(
        expense_exists_in_org,
        require_expense_in_org,
        expenses::Entity,
        expenses::Column::OrgId,
        "expense not exists"
    );

    async fn find_org_by_id(
        &self,
        db: &DatabaseTransaction,
        org_id: Uuid,
    ) -> ResultLedger<Option<organizations::Model>> {
        organizations::Entity::find_by_id(org_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn org_membership_role(
        &self,
        db: &DatabaseTransaction,
        org_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Option<OrgRole>> {
        let row =
            org_memberships::Entity::find_by_id((org_id.to_string(), user_id.to_string()))
                .one(db)
                .await?;
        row.as_ref()
            .map(|m| OrgRole::try_from(m.role.as_str()))
            .transpose()
    }

    /// Read access: the owner or any member. Hidden organizations surface as
    /// NotFound so their existence leaks nothing.
    pub(super) async fn require_org_read(
        &self,
        db: &DatabaseTransaction,
        org_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<organizations::Model> {
        let model = self
            .find_org_by_id(db, org_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound("organization not exists".to_string()))?;
        if model.owner != user_id
            && self
                .org_membership_role(db, org_id, user_id)
                .await?
                .is_none()
        {
            return Err(LedgerError::NotFound("organization not exists".to_string()));
        }
        Ok(model)
    }

    /// Write access: the owner, or a member whose role can write. A viewer
    /// sees the organization, so a write attempt is Forbidden, not NotFound.
    pub(super) async fn require_org_write(
        &self,
        db: &DatabaseTransaction,
        org_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<organizations::Model> {
        let model = self.require_org_read(db, org_id, user_id).await?;
        if model.owner == user_id {
            return Ok(model);
        }
        let role = self
            .org_membership_role(db, org_id, user_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound("organization not exists".to_string()))?;
        if !role.can_write() {
            return Err(LedgerError::Forbidden(
                "write access required".to_string(),
            ));
        }
        Ok(model)
    }

    /// Member management is reserved to the owner (and owner-role members).
    pub(super) async fn require_org_owner(
        &self,
        db: &DatabaseTransaction,
        org_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<organizations::Model> {
        let model = self.require_org_read(db, org_id, user_id).await?;
        if model.owner == user_id {
            return Ok(model);
        }
        match self.org_membership_role(db, org_id, user_id).await? {
            Some(OrgRole::Owner) => Ok(model),
            Some(_) => Err(LedgerError::Forbidden(
                "owner access required".to_string(),
            )),
            None => Err(LedgerError::NotFound("organization not exists".to_string())),
        }
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultLedger<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(LedgerError::NotFound("user not exists".to_string()));
        }
        Ok(())
    }
}
