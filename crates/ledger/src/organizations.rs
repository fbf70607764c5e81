//! Organizations: the tenant boundary.
//!
//! Every monetary row in the schema carries an `org_id`; operations must
//! never aggregate across organizations.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    /// Username of the owning user. Owners always have write access and are
    /// the only ones who may manage members.
    pub owner: String,
}

impl Organization {
    pub fn new(name: String, owner: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            owner: owner.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub owner: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Organization> for ActiveModel {
    fn from(org: &Organization) -> Self {
        Self {
            id: ActiveValue::Set(org.id.to_string()),
            name: ActiveValue::Set(org.name.clone()),
            owner: ActiveValue::Set(org.owner.clone()),
        }
    }
}

impl TryFrom<Model> for Organization {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            name: model.name,
            owner: model.owner,
        })
    }
}
