use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
    TransactionTrait, prelude::*,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    LedgerError, Patch, Project, ProjectStatus, ResultLedger, Stage, projects, stages,
};

use super::{Ledger, Page, normalize_required_name, with_tx};

impl Ledger {
    pub async fn new_project(
        &self,
        org_id: Uuid,
        user_id: &str,
        name: &str,
        budget_minor: i64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        client_party_id: Option<Uuid>,
    ) -> ResultLedger<Project> {
        let name = normalize_required_name(name, "project")?;

        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            if let Some(party_id) = client_party_id {
                self.require_party_in_org(&db_tx, org_id, party_id).await?;
            }

            let project = Project::new(
                org_id,
                name,
                budget_minor,
                start_date,
                end_date,
                client_party_id,
            )?;
            projects::ActiveModel::from(&project).insert(&db_tx).await?;
            Ok(project)
        })
    }

    pub async fn project(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Project> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            let model = projects::Entity::find_by_id(project_id.to_string())
                .filter(projects::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("project not exists".to_string()))?;
            Project::try_from(model)
        })
    }

    /// Lists projects in an organization, newest start date first.
    /// Returns the page of rows and the unpaged total.
    pub async fn projects(
        &self,
        org_id: Uuid,
        user_id: &str,
        status: Option<ProjectStatus>,
        page: Page,
    ) -> ResultLedger<(Vec<Project>, u64)> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;

            let mut query = projects::Entity::find()
                .filter(projects::Column::OrgId.eq(org_id.to_string()));
            if let Some(status) = status {
                query = query.filter(projects::Column::Status.eq(status.as_str()));
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(projects::Column::StartDate)
                .offset(page.offset())
                .limit(page.limit)
                .all(&db_tx)
                .await?;

            let rows = models
                .into_iter()
                .map(Project::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            Ok((rows, total))
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_project(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        name: Option<&str>,
        budget_minor: Option<i64>,
        start_date: Option<NaiveDate>,
        end_date: Patch<NaiveDate>,
        client_party_id: Patch<Uuid>,
        status: Option<ProjectStatus>,
    ) -> ResultLedger<Project> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = projects::Entity::find_by_id(project_id.to_string())
                .filter(projects::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("project not exists".to_string()))?;
            let mut project = Project::try_from(model)?;

            if let Some(name) = name {
                project.name = normalize_required_name(name, "project")?;
            }
            if let Some(budget) = budget_minor {
                if budget < 0 {
                    return Err(LedgerError::Validation(
                        "budget_minor must be >= 0".to_string(),
                    ));
                }
                project.budget_minor = budget;
            }
            if let Some(start) = start_date {
                project.start_date = start;
            }
            project.end_date = end_date.apply(project.end_date);
            if let Some(end) = project.end_date
                && end < project.start_date
            {
                return Err(LedgerError::Validation(
                    "end_date must not be before start_date".to_string(),
                ));
            }
            if let Patch::Set(party_id) = client_party_id {
                self.require_party_in_org(&db_tx, org_id, party_id).await?;
            }
            project.client_party_id = client_party_id.apply(project.client_party_id);
            if let Some(status) = status {
                project.status = status;
            }

            let mut active = projects::ActiveModel::from(&project);
            active.id = ActiveValue::Unchanged(project.id.to_string());
            active.update(&db_tx).await?;
            Ok(project)
        })
    }

    /// Deletes a project and everything under it.
    pub async fn delete_project(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            // Explicit cascade within one DB transaction; the schema does not
            // declare ON DELETE CASCADE everywhere.
            let backend = self.database.get_database_backend();
            for table in [
                "payments",
                "expenses",
                "member_advances",
                "tasks",
                "boq_items",
                "stages",
            ] {
                db_tx
                    .execute(Statement::from_sql_and_values(
                        backend,
                        format!("DELETE FROM {table} WHERE project_id = ?;"),
                        vec![project_id.to_string().into()],
                    ))
                    .await?;
            }
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM projects WHERE id = ?;",
                    vec![project_id.to_string().into()],
                ))
                .await?;

            Ok(())
        })
    }

    pub async fn new_stage(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
        name: &str,
        position: i32,
    ) -> ResultLedger<Stage> {
        let name = normalize_required_name(name, "stage")?;

        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let stage = Stage::new(org_id, project_id, name, position);
            stages::ActiveModel::from(&stage).insert(&db_tx).await?;
            Ok(stage)
        })
    }

    /// Stages of a project, in display order.
    pub async fn stages(
        &self,
        org_id: Uuid,
        project_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Vec<Stage>> {
        with_tx!(self, |db_tx| {
            self.require_org_read(&db_tx, org_id, user_id).await?;
            self.require_project_in_org(&db_tx, org_id, project_id)
                .await?;

            let models = stages::Entity::find()
                .filter(stages::Column::ProjectId.eq(project_id.to_string()))
                .order_by_asc(stages::Column::Position)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Stage::try_from).collect()
        })
    }

    pub async fn update_stage(
        &self,
        org_id: Uuid,
        stage_id: Uuid,
        user_id: &str,
        name: Option<&str>,
        position: Option<i32>,
    ) -> ResultLedger<Stage> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = stages::Entity::find_by_id(stage_id.to_string())
                .filter(stages::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("stage not exists".to_string()))?;
            let mut stage = Stage::try_from(model)?;

            if let Some(name) = name {
                stage.name = normalize_required_name(name, "stage")?;
            }
            if let Some(position) = position {
                stage.position = position;
            }

            let mut active = stages::ActiveModel::from(&stage);
            active.id = ActiveValue::Unchanged(stage.id.to_string());
            active.update(&db_tx).await?;
            Ok(stage)
        })
    }

    /// Deleting a stage detaches its expenses rather than deleting them.
    pub async fn delete_stage(
        &self,
        org_id: Uuid,
        stage_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_org_write(&db_tx, org_id, user_id).await?;
            let model = stages::Entity::find_by_id(stage_id.to_string())
                .filter(stages::Column::OrgId.eq(org_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound("stage not exists".to_string()))?;

            let backend = self.database.get_database_backend();
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "UPDATE expenses SET stage_id = NULL WHERE stage_id = ?;",
                    vec![stage_id.to_string().into()],
                ))
                .await?;

            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
