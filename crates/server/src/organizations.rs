//! Organization and membership endpoints (member management is owner-only).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::membership::{MemberUpsert, MemberView, MembersResponse};
use api_types::org::{OrgNew, OrgView};

use crate::{
    ApiOk, ServerError,
    convert::{org_role, org_role_view, org_view},
    server::ServerState,
    user,
};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<OrgNew>,
) -> Result<ApiOk<OrgView>, ServerError> {
    let org = state
        .ledger
        .new_organization(&payload.name, &user.username)
        .await?;
    Ok(ApiOk::created(org_view(org)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<ApiOk<Vec<OrgView>>, ServerError> {
    let orgs = state
        .ledger
        .organizations_for_user(&user.username)
        .await?
        .into_iter()
        .map(org_view)
        .collect();
    Ok(ApiOk::ok(orgs))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
) -> Result<ApiOk<OrgView>, ServerError> {
    let org = state.ledger.organization(org_id, &user.username).await?;
    Ok(ApiOk::ok(org_view(org)))
}

pub async fn list_members(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
) -> Result<ApiOk<MembersResponse>, ServerError> {
    let members = state
        .ledger
        .members(org_id, &user.username)
        .await?
        .into_iter()
        .map(|(username, role)| MemberView {
            username,
            role: org_role_view(role),
        })
        .collect();

    Ok(ApiOk::ok(MembersResponse { members }))
}

pub async fn upsert_member(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<MemberUpsert>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .upsert_member(org_id, &user.username, &payload.username, org_role(payload.role))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_member(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, username)): Path<(Uuid, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .remove_member(org_id, &user.username, &username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
