//! Parties: the counterparties referenced by expenses and payments.
//!
//! A party's credit/outstanding balance is always derived by the summary
//! aggregator, never stored on the row.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyKind {
    Vendor,
    Labour,
    Subcontractor,
    Client,
}

impl PartyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vendor => "VENDOR",
            Self::Labour => "LABOUR",
            Self::Subcontractor => "SUBCONTRACTOR",
            Self::Client => "CLIENT",
        }
    }
}

impl TryFrom<&str> for PartyKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "VENDOR" => Ok(Self::Vendor),
            "LABOUR" => Ok(Self::Labour),
            "SUBCONTRACTOR" => Ok(Self::Subcontractor),
            "CLIENT" => Ok(Self::Client),
            other => Err(LedgerError::Validation(format!(
                "invalid party kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub kind: PartyKind,
}

impl Party {
    pub fn new(
        org_id: Uuid,
        name: String,
        phone: Option<String>,
        location: Option<String>,
        kind: PartyKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            name,
            phone,
            location,
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Party> for ActiveModel {
    fn from(party: &Party) -> Self {
        Self {
            id: ActiveValue::Set(party.id.to_string()),
            org_id: ActiveValue::Set(party.org_id.to_string()),
            name: ActiveValue::Set(party.name.clone()),
            phone: ActiveValue::Set(party.phone.clone()),
            location: ActiveValue::Set(party.location.clone()),
            kind: ActiveValue::Set(party.kind.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Party {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("party not exists".to_string()))?,
            org_id: Uuid::parse_str(&model.org_id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            name: model.name,
            phone: model.phone,
            location: model.location,
            kind: PartyKind::try_from(model.kind.as_str())?,
        })
    }
}
