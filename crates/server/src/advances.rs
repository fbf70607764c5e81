//! Member advance endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::advance::{AdvanceListQuery, AdvanceNew, AdvanceUpdate, AdvanceView};
use api_types::common::Paginated;

use crate::{
    ApiOk, ServerError,
    convert::{advance_view, page_from, paginated, payment_mode},
    server::ServerState,
    user,
};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AdvanceNew>,
) -> Result<ApiOk<AdvanceView>, ServerError> {
    let advance = state
        .ledger
        .new_advance(
            org_id,
            project_id,
            &user.username,
            &payload.member,
            payload.amount_minor,
            &payload.purpose,
            payment_mode(payload.mode),
            payload.advance_date,
            payload.expected_settlement_date,
            payload.notes.as_deref(),
        )
        .await?;
    Ok(ApiOk::created(advance_view(advance)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<AdvanceListQuery>,
) -> Result<ApiOk<Paginated<AdvanceView>>, ServerError> {
    let page = page_from(query.page, query.limit)?;
    let (advances, total) = state
        .ledger
        .advances(
            org_id,
            project_id,
            &user.username,
            query.member.as_deref(),
            page,
        )
        .await?;

    let items = advances.into_iter().map(advance_view).collect();
    Ok(ApiOk::ok(paginated(items, page, total)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, advance_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AdvanceUpdate>,
) -> Result<ApiOk<AdvanceView>, ServerError> {
    let advance = state
        .ledger
        .update_advance(
            org_id,
            advance_id,
            &user.username,
            payload.amount_minor,
            payload.purpose.as_deref(),
            payload.mode.map(payment_mode),
            payload.advance_date,
            payload.expected_settlement_date.into(),
            payload.notes.into(),
        )
        .await?;
    Ok(ApiOk::ok(advance_view(advance)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, advance_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_advance(org_id, advance_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
