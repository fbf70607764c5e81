//! Task endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::common::Paginated;
use api_types::task::{TaskListQuery, TaskNew, TaskUpdate, TaskView};

use crate::{
    ApiOk, ServerError,
    convert::{page_from, paginated, task_status, task_view},
    server::ServerState,
    user,
};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TaskNew>,
) -> Result<ApiOk<TaskView>, ServerError> {
    let task = state
        .ledger
        .new_task(
            org_id,
            project_id,
            &user.username,
            &payload.title,
            payload.description.as_deref(),
            payload.due_date,
            payload.assigned_to.as_deref(),
        )
        .await?;
    Ok(ApiOk::created(task_view(task)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<TaskListQuery>,
) -> Result<ApiOk<Paginated<TaskView>>, ServerError> {
    let page = page_from(query.page, query.limit)?;
    let (tasks, total) = state
        .ledger
        .tasks(
            org_id,
            project_id,
            &user.username,
            query.status.map(task_status),
            page,
        )
        .await?;

    let items = tasks.into_iter().map(task_view).collect();
    Ok(ApiOk::ok(paginated(items, page, total)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TaskUpdate>,
) -> Result<ApiOk<TaskView>, ServerError> {
    let task = state
        .ledger
        .update_task(
            org_id,
            task_id,
            &user.username,
            payload.title.as_deref(),
            payload.description.into(),
            payload.status.map(task_status),
            payload.due_date.into(),
            payload.assigned_to.into(),
        )
        .await?;
    Ok(ApiOk::ok(task_view(task)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_task(org_id, task_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
