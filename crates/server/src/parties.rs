//! Party (vendor/labour/subcontractor/client) endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use api_types::common::Paginated;
use api_types::party::{PartyListQuery, PartyNew, PartyUpdate, PartyView};

use crate::{
    ApiOk, ServerError,
    convert::{page_from, paginated, party_kind, party_view},
    server::ServerState,
    user,
};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<PartyNew>,
) -> Result<ApiOk<PartyView>, ServerError> {
    let party = state
        .ledger
        .new_party(
            org_id,
            &user.username,
            &payload.name,
            payload.phone.as_deref(),
            payload.location.as_deref(),
            party_kind(payload.kind),
        )
        .await?;
    Ok(ApiOk::created(party_view(party)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<PartyListQuery>,
) -> Result<ApiOk<Paginated<PartyView>>, ServerError> {
    let page = page_from(query.page, query.limit)?;
    let (parties, total) = state
        .ledger
        .parties(org_id, &user.username, query.kind.map(party_kind), page)
        .await?;

    let items = parties.into_iter().map(party_view).collect();
    Ok(ApiOk::ok(paginated(items, page, total)))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, party_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<PartyView>, ServerError> {
    let party = state.ledger.party(org_id, party_id, &user.username).await?;
    Ok(ApiOk::ok(party_view(party)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, party_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<PartyUpdate>,
) -> Result<ApiOk<PartyView>, ServerError> {
    let party = state
        .ledger
        .update_party(
            org_id,
            party_id,
            &user.username,
            payload.name.as_deref(),
            payload.phone.into(),
            payload.location.into(),
            payload.kind.map(party_kind),
        )
        .await?;
    Ok(ApiOk::ok(party_view(party)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, party_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_party(org_id, party_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
