//! Payment endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use ledger::{CreatePaymentCmd, PaymentListFilter};
use uuid::Uuid;

use api_types::common::Paginated;
use api_types::payment::{PaymentListQuery, PaymentNew, PaymentView};

use crate::{
    ApiOk, ServerError,
    convert::{page_from, paginated, payment_kind, payment_mode, payment_view},
    server::ServerState,
    user,
};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<PaymentNew>,
) -> Result<ApiOk<PaymentView>, ServerError> {
    let cmd = CreatePaymentCmd {
        org_id,
        project_id,
        party_id: payload.party_id,
        expense_id: payload.expense_id,
        kind: payment_kind(payload.kind),
        mode: payment_mode(payload.mode),
        amount_minor: payload.amount_minor,
        payment_date: payload.payment_date,
        reference_number: payload.reference_number,
        notes: payload.notes,
    };

    let payment = state.ledger.new_payment(&user.username, cmd).await?;
    Ok(ApiOk::created(payment_view(payment)))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<PaymentListQuery>,
) -> Result<ApiOk<Paginated<PaymentView>>, ServerError> {
    let page = page_from(query.page, query.limit)?;
    let filter = PaymentListFilter {
        party_id: query.party_id,
        kind: query.kind.map(payment_kind),
        from: query.from,
        to: query.to,
    };

    let (payments, total) = state
        .ledger
        .payments(org_id, project_id, &user.username, filter, page)
        .await?;

    let items = payments.into_iter().map(payment_view).collect();
    Ok(ApiOk::ok(paginated(items, page, total)))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, payment_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<PaymentView>, ServerError> {
    let payment = state
        .ledger
        .payment(org_id, payment_id, &user.username)
        .await?;
    Ok(ApiOk::ok(payment_view(payment)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, payment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_payment(org_id, payment_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
