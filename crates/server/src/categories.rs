//! Expense category endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::category::{CategoryNew, CategoryRename, CategoryView};

use crate::{ApiOk, ServerError, convert::category_view, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CategoryNew>,
) -> Result<ApiOk<CategoryView>, ServerError> {
    let category = state
        .ledger
        .new_category(org_id, &user.username, &payload.name)
        .await?;
    Ok(ApiOk::created(category_view(category)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
) -> Result<ApiOk<Vec<CategoryView>>, ServerError> {
    let categories = state
        .ledger
        .categories(org_id, &user.username)
        .await?
        .into_iter()
        .map(category_view)
        .collect();
    Ok(ApiOk::ok(categories))
}

pub async fn rename(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, category_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CategoryRename>,
) -> Result<ApiOk<CategoryView>, ServerError> {
    let category = state
        .ledger
        .rename_category(org_id, category_id, &user.username, &payload.name)
        .await?;
    Ok(ApiOk::ok(category_view(category)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, category_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_category(org_id, category_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
