//! Project and stage endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::common::Paginated;
use api_types::project::{ProjectListQuery, ProjectNew, ProjectUpdate, ProjectView};
use api_types::stage::{StageNew, StageUpdate, StageView};

use crate::{
    ApiOk, ServerError,
    convert::{page_from, paginated, project_status, project_view, stage_view},
    server::ServerState,
    user,
};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<ProjectNew>,
) -> Result<ApiOk<ProjectView>, ServerError> {
    let project = state
        .ledger
        .new_project(
            org_id,
            &user.username,
            &payload.name,
            payload.budget_minor,
            payload.start_date,
            payload.end_date,
            payload.client_party_id,
        )
        .await?;
    Ok(ApiOk::created(project_view(project)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ProjectListQuery>,
) -> Result<ApiOk<Paginated<ProjectView>>, ServerError> {
    let page = page_from(query.page, query.limit)?;
    let (projects, total) = state
        .ledger
        .projects(
            org_id,
            &user.username,
            query.status.map(project_status),
            page,
        )
        .await?;

    let items = projects.into_iter().map(project_view).collect();
    Ok(ApiOk::ok(paginated(items, page, total)))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<ProjectView>, ServerError> {
    let project = state
        .ledger
        .project(org_id, project_id, &user.username)
        .await?;
    Ok(ApiOk::ok(project_view(project)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<ApiOk<ProjectView>, ServerError> {
    let project = state
        .ledger
        .update_project(
            org_id,
            project_id,
            &user.username,
            payload.name.as_deref(),
            payload.budget_minor,
            payload.start_date,
            payload.end_date.into(),
            payload.client_party_id.into(),
            payload.status.map(project_status),
        )
        .await?;
    Ok(ApiOk::ok(project_view(project)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_project(org_id, project_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_stage(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<StageNew>,
) -> Result<ApiOk<StageView>, ServerError> {
    let stage = state
        .ledger
        .new_stage(
            org_id,
            project_id,
            &user.username,
            &payload.name,
            payload.position,
        )
        .await?;
    Ok(ApiOk::created(stage_view(stage)))
}

pub async fn list_stages(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<Vec<StageView>>, ServerError> {
    let stages = state
        .ledger
        .stages(org_id, project_id, &user.username)
        .await?
        .into_iter()
        .map(stage_view)
        .collect();
    Ok(ApiOk::ok(stages))
}

pub async fn update_stage(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, stage_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<StageUpdate>,
) -> Result<ApiOk<StageView>, ServerError> {
    let stage = state
        .ledger
        .update_stage(
            org_id,
            stage_id,
            &user.username,
            payload.name.as_deref(),
            payload.position,
        )
        .await?;
    Ok(ApiOk::ok(stage_view(stage)))
}

pub async fn remove_stage(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, stage_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_stage(org_id, stage_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
