//! Projects own all ledger rows below the organization level.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::OnHold => "ON_HOLD",
            Self::Completed => "COMPLETED",
        }
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ACTIVE" => Ok(Self::Active),
            "ON_HOLD" => Ok(Self::OnHold),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(LedgerError::Validation(format!(
                "invalid project status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    /// Contracted budget in minor units.
    pub budget_minor: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Optional CLIENT party this project is billed to.
    pub client_party_id: Option<Uuid>,
    pub status: ProjectStatus,
}

impl Project {
    pub fn new(
        org_id: Uuid,
        name: String,
        budget_minor: i64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        client_party_id: Option<Uuid>,
    ) -> ResultLedger<Self> {
        if budget_minor < 0 {
            return Err(LedgerError::Validation(
                "budget_minor must be >= 0".to_string(),
            ));
        }
        if let Some(end) = end_date
            && end < start_date
        {
            return Err(LedgerError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            org_id,
            name,
            budget_minor,
            start_date,
            end_date,
            client_party_id,
            status: ProjectStatus::Active,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub budget_minor: i64,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub client_party_id: Option<String>,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(project: &Project) -> Self {
        Self {
            id: ActiveValue::Set(project.id.to_string()),
            org_id: ActiveValue::Set(project.org_id.to_string()),
            name: ActiveValue::Set(project.name.clone()),
            budget_minor: ActiveValue::Set(project.budget_minor),
            start_date: ActiveValue::Set(project.start_date),
            end_date: ActiveValue::Set(project.end_date),
            client_party_id: ActiveValue::Set(
                project.client_party_id.map(|id| id.to_string()),
            ),
            status: ActiveValue::Set(project.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("project not exists".to_string()))?,
            org_id: Uuid::parse_str(&model.org_id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            name: model.name,
            budget_minor: model.budget_minor,
            start_date: model.start_date,
            end_date: model.end_date,
            client_party_id: model
                .client_party_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            status: ProjectStatus::try_from(model.status.as_str())?,
        })
    }
}
