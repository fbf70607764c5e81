use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    LedgerError, Party, PartyKind, Patch, ResultLedger, expenses, parties, payments, projects,
};

use super::{Ledger, Page, normalize_optional_text, normalize_required_name, with_tx};

impl Ledger {
    pub async fn new_party(
        &self,
        org_id: Uuid,
        user_id: &str,
        name: &str,
        phone: Option<&str>,
        location: Option<&str>,
        kind: PartyKind,
    ) -> ResultLedger<Party> {
        let name = normalize_required_name(name, "party")?;

        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;

            let party = Party::new(
                org_id,
                name,
                normalize_optional_text(phone),
                normalize_optional_text(location),
                kind,
            );
            parties::ActiveModel::from(&party).insert(&db_tx).await?;
            Ok(party)
        })
    }

    pub async fn party(&self, org_id: Uuid, party_id: Uuid, user_id: &str) -> ResultLedger<Party> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            let model = parties::Entity::find_by_id(party_id.to_string())
                .filter(parties::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("party not exists".to_string()))?;
            Party::try_from(model)
        })
    }

    /// Parties of an organization, optionally filtered by kind, ordered by
    /// name. Returns the page of rows and the unpaged total.
    pub async fn parties(
        &self,
        org_id: Uuid,
        user_id: &str,
        kind: Option<PartyKind>,
        page: Page,
    ) -> ResultLedger<(Vec<Party>, u64)> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;

            let mut query =
                parties::Entity::find().filter(parties::Column::OrgId.eq(org_id.to_string()));
            if let Some(kind) = kind {
                query = query.filter(parties::Column::Kind.eq(kind.as_str()));
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_asc(parties::Column::Name)
                .offset(page.offset())
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            let rows = models
                .into_iter()
                .map(Party::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            Ok((rows, total))
        })
    }

    pub async fn update_party(
        &self,
        org_id: Uuid,
        party_id: Uuid,
        user_id: &str,
        name: Option<&str>,
        phone: Patch<String>,
        location: Patch<String>,
        kind: Option<PartyKind>,
    ) -> ResultLedger<Party> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = parties::Entity::find_by_id(party_id.to_string())
                .filter(parties::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("party not exists".to_string()))?;
            let mut party = Party::try_from(model)?;

            if let Some(name) = name {
                party.name = normalize_required_name(name, "party")?;
            }
            match phone {
                Patch::Keep => {}
                Patch::Clear => party.phone = None,
                Patch::Set(value) => party.phone = normalize_optional_text(Some(&value)),
            }
            match location {
                Patch::Keep => {}
                Patch::Clear => party.location = None,
                Patch::Set(value) => party.location = normalize_optional_text(Some(&value)),
            }
            if let Some(kind) = kind {
                party.kind = kind;
            }

            let mut active = parties::ActiveModel::from(&party);
            active.id = ActiveValue::Unchanged(party.id.to_string());
            active.update(&db_tx).await?;
            Ok(party)
        })
    }

    /// A party referenced by expenses, payments, or a project's client link
    /// cannot be deleted; the rows pointing at it would dangle.
    pub async fn delete_party(
        &self,
        org_id: Uuid,
        party_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = parties::Entity::find_by_id(party_id.to_string())
                .filter(parties::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("party not exists".to_string()))?;

            let in_expenses = expenses::Entity::find()
                .filter(expenses::Column::PartyId.eq(party_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            let in_payments = payments::Entity::find()
                .filter(payments::Column::PartyId.eq(party_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            let in_projects = projects::Entity::find()
                .filter(projects::Column::ClientPartyId.eq(party_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if in_expenses || in_payments || in_projects {
                return Err(LedgerError::Validation(
                    "party is referenced by ledger rows".to_string(),
                ));
            }

            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
