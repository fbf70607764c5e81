use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{LedgerError, Patch, ResultLedger, Task, TaskStatus, tasks};

use super::{Ledger, Page, normalize_optional_text, normalize_required_name, with_tx};

impl Ledger {
    pub async fn new_task(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        title: &str,
        description: Option<&str>,
        due_date: Option<NaiveDate>,
        assigned_to: Option<&str>,
    ) -> ResultLedger<Task> {
        let title = normalize_required_name(title, "task")?;

        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;
            if let Some(assignee) = assigned_to {
                self.require_user_exists(&db_tx, assignee).await?;
            }

            let task = Task::new(
                org_id,
                project_id,
                title,
                normalize_optional_text(description),
                due_date,
                assigned_to.map(ToString::to_string),
            );
            tasks::ActiveModel::from(&task).insert(&db_tx).await?;
            Ok(task)
        })
    }

    /// Tasks of a project, optionally filtered by status, due-date order.
    /// Returns the page of rows and the unpaged total.
    pub async fn tasks(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        status: Option<TaskStatus>,
        page: Page,
    ) -> ResultLedger<(Vec<Task>, u64)> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let mut query = tasks::Entity::find()
                .filter(tasks::Column::OrgId.eq(org_id.to_string()))
                .filter(tasks::Column::ProjectId.eq(project_id.to_string()));
            if let Some(status) = status {
                query = query.filter(tasks::Column::Status.eq(status.as_str()));
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_asc(tasks::Column::DueDate)
                .offset(page.offset())
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            let rows = models
                .into_iter()
                .map(Task::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            Ok((rows, total))
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_task(
        &self,
        org_id: Uuid,
        task_id: Uuid,
        user_id: &str,
        title: Option<&str>,
        description: Patch<String>,
        status: Option<TaskStatus>,
        due_date: Patch<NaiveDate>,
        assigned_to: Patch<String>,
    ) -> ResultLedger<Task> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = tasks::Entity::find_by_id(task_id.to_string())
                .filter(tasks::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("task not exists".to_string()))?;
            let mut task = Task::try_from(model)?;

            if let Some(title) = title {
                task.title = normalize_required_name(title, "task")?;
            }
            match description {
                Patch::Keep => {}
                Patch::Clear => task.description = None,
                Patch::Set(value) => task.description = normalize_optional_text(Some(&value)),
            }
            if let Some(status) = status {
                task.status = status;
            }
            task.due_date = due_date.apply(task.due_date);
            if let Patch::Set(assignee) = &assigned_to {
                self.require_user_exists(&db_tx, assignee).await?;
            }
            task.assigned_to = assigned_to.apply(task.assigned_to);

            let mut active = tasks::ActiveModel::from(&task);
            active.id = ActiveValue::Unchanged(task.id.to_string());
            active.update(&db_tx).await?;
            Ok(task)
        })
    }

    pub async fn delete_task(
        &self,
        org_id: Uuid,
        task_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = tasks::Entity::find_by_id(task_id.to_string())
                .filter(tasks::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("task not exists".to_string()))?;

            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
