use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{LedgerError, OrgRole, Organization, ResultLedger, org_memberships, organizations};

use super::{Ledger, normalize_required_name, with_tx};

impl Ledger {
    /// Add a new organization. The creator becomes the owner and gets an
    /// explicit owner membership row.
    pub async fn new_organization(&self, name: &str, user_id: &str) -> ResultLedger<Organization> {
        let name = normalize_required_name(name, "organization")?;

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            // Unique name per owner (case-insensitive) to avoid ambiguous lookups.
            let exists = organizations::Entity::find()
                .filter(organizations::Column::Owner.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(LedgerError::AlreadyExists(name));
            }

            let org = Organization::new(name, user_id);
            organizations::ActiveModel::from(&org).insert(&db_tx).await?;

            let membership = org_memberships::ActiveModel {
                org_id: ActiveValue::Set(org.id.to_string()),
                username: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(OrgRole::Owner.as_str().to_string()),
            };
            membership.insert(&db_tx).await?;

            Ok(org)
        })
    }

    pub async fn organization(&self, org_id: Uuid, user_id: &str) -> ResultLedger<Organization> {
        with_tx!(self, |db_tx| {
            let model = self.require_org_read(&db_tx, org_id, user_id).await?;
            Organization::try_from(model)
        })
    }

    /// Organizations the user owns or is a member of, ordered by name.
    pub async fn organizations_for_user(&self, user_id: &str) -> ResultLedger<Vec<Organization>> {
        let member_org_ids: Vec<String> = org_memberships::Entity::find()
            .filter(org_memberships::Column::Username.eq(user_id.to_string()))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|m| m.org_id)
            .collect();

        let models = organizations::Entity::find()
            .filter(
                Condition::any()
                    .add(organizations::Column::Owner.eq(user_id.to_string()))
                    .add(organizations::Column::Id.is_in(member_org_ids)),
            )
            .order_by_asc(organizations::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Organization::try_from).collect()
    }

    /// Add or replace a membership. Owner-only; the org owner's implicit
    /// access cannot be demoted through this path.
    pub async fn upsert_member(
        &self,
        org_id: Uuid,
        user_id: &str,
        member: &str,
        role: OrgRole,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let org = self.require_org_owner(&db_tx, org_id, user_id).await?;
            if org.owner == member {
                return Err(LedgerError::Validation(
                    "cannot change the owner's role".to_string(),
                ));
            }
            self.require_user_exists(&db_tx, member).await?;

            let existing = org_memberships::Entity::find_by_id((
                org_id.to_string(),
                member.to_string(),
            ))
            .one(&db_tx)
            .await?;

            let row = org_memberships::ActiveModel {
                org_id: ActiveValue::Set(org_id.to_string()),
                username: ActiveValue::Set(member.to_string()),
                role: ActiveValue::Set(role.as_str().to_string()),
            };
            if existing.is_some() {
                row.update(&db_tx).await?;
            } else {
                row.insert(&db_tx).await?;
            }
            Ok(())
        })
    }

    pub async fn remove_member(
        &self,
        org_id: Uuid,
        user_id: &str,
        member: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let org = self.require_org_owner(&db_tx, org_id, user_id).await?;
            if org.owner == member {
                return Err(LedgerError::Validation(
                    "cannot remove the owner".to_string(),
                ));
            }

            let row = org_memberships::Entity::find_by_id((
                org_id.to_string(),
                member.to_string(),
            ))
            .one(&db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound("membership not exists".to_string()))?;

            row.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Members of an organization as `(username, role)` pairs.
    pub async fn members(
        &self,
        org_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Vec<(String, OrgRole)>> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;

            let rows = org_memberships::Entity::find()
                .filter(org_memberships::Column::OrgId.eq(org_id.to_string()))
                .order_by_asc(org_memberships::Column::Username)
                .all(&db_tx)
                .await?;

            rows.into_iter()
                .map(|m| Ok((m.username, OrgRole::try_from(m.role.as_str())?)))
                .collect()
        })
    }
}
