//! Project tasks.
//!
//! Task status carries no enforced transition graph: any status may be set
//! to any other via update, matching how site teams actually use it.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::OnHold => "ON_HOLD",
            Self::Blocked => "BLOCKED",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "NOT_STARTED" => Ok(Self::NotStarted),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "ON_HOLD" => Ok(Self::OnHold),
            "BLOCKED" => Ok(Self::Blocked),
            other => Err(LedgerError::Validation(format!(
                "invalid task status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    /// Username of the assignee.
    pub assigned_to: Option<String>,
}

impl Task {
    pub fn new(
        org_id: Uuid,
        project_id: Uuid,
        title: String,
        description: Option<String>,
        due_date: Option<NaiveDate>,
        assigned_to: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            project_id,
            title,
            description,
            status: TaskStatus::NotStarted,
            due_date,
            assigned_to,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<Date>,
    pub assigned_to: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Task> for ActiveModel {
    fn from(task: &Task) -> Self {
        Self {
            id: ActiveValue::Set(task.id.to_string()),
            org_id: ActiveValue::Set(task.org_id.to_string()),
            project_id: ActiveValue::Set(task.project_id.to_string()),
            title: ActiveValue::Set(task.title.clone()),
            description: ActiveValue::Set(task.description.clone()),
            status: ActiveValue::Set(task.status.as_str().to_string()),
            due_date: ActiveValue::Set(task.due_date),
            assigned_to: ActiveValue::Set(task.assigned_to.clone()),
        }
    }
}

impl TryFrom<Model> for Task {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("task not exists".to_string()))?,
            org_id: Uuid::parse_str(&model.org_id)
                .map_err(|_| LedgerError::NotFound("organization not exists".to_string()))?,
            project_id: Uuid::parse_str(&model.project_id)
                .map_err(|_| LedgerError::NotFound("project not exists".to_string()))?,
            title: model.title,
            description: model.description,
            status: TaskStatus::try_from(model.status.as_str())?,
            due_date: model.due_date,
            assigned_to: model.assigned_to,
        })
    }
}
