//! Project stages (foundation, framing, finishing, ...).

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    /// Display order within the project.
    pub position: i32,
}

impl Stage {
    pub fn new(org_id: Uuid, project_id: Uuid, name: String, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            project_id,
            name,
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub name: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Stage> for ActiveModel {
    fn from(stage: &Stage) -> Self {
        Self {
            id: ActiveValue::Set(stage.id.to_string()),
            org_id: ActiveValue::Set(stage.org_id.to_string()),
            project_id: ActiveValue::Set(stage.project_id.to_string()),
            name: ActiveValue::Set(stage.name.clone()),
            position: ActiveValue::Set(stage.position),
        }
    }
}

impl TryFrom<Model> for Stage {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("stage not exists".to_string()))?,
            org_id: Uuid::parse_str(&model.org_id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            project_id: Uuid::parse_str(&model.project_id)
                .map_err(|_| LedgerError::NotFound("project not exists".to_string()))?,
            name: model.name,
            position: model.position,
        })
    }
}
