//! Bill-of-quantities endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::boq::{BoqItemNew, BoqItemUpdate, BoqItemView};

use crate::{ApiOk, ServerError, convert::boq_item_view, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<BoqItemNew>,
) -> Result<ApiOk<BoqItemView>, ServerError> {
    let item = state
        .ledger
        .new_boq_item(
            org_id,
            project_id,
            &user.username,
            &payload.name,
            &payload.unit,
            payload.rate_minor,
            payload.quantity_milli,
        )
        .await?;
    Ok(ApiOk::created(boq_item_view(item)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<Vec<BoqItemView>>, ServerError> {
    let items = state
        .ledger
        .boq_items(org_id, project_id, &user.username)
        .await?
        .into_iter()
        .map(boq_item_view)
        .collect();
    Ok(ApiOk::ok(items))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<BoqItemUpdate>,
) -> Result<ApiOk<BoqItemView>, ServerError> {
    let item = state
        .ledger
        .update_boq_item(
            org_id,
            item_id,
            &user.username,
            payload.name.as_deref(),
            payload.unit.as_deref(),
            payload.rate_minor,
            payload.quantity_milli,
        )
        .await?;
    Ok(ApiOk::ok(boq_item_view(item)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_boq_item(org_id, item_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
