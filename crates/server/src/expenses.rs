//! Expense endpoints, including atomic create-with-immediate-payment and
//! the one-way approval transition.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use ledger::{CreateExpenseCmd, ExpenseListFilter, ImmediatePayment};
use uuid::Uuid;

use api_types::common::Paginated;
use api_types::expense::{ExpenseCreated, ExpenseListQuery, ExpenseNew, ExpenseUpdate, ExpenseView};

use crate::{
    ApiOk, ServerError,
    convert::{expense_status, expense_view, page_from, paginated, payment_mode, payment_view},
    server::ServerState,
    user,
};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ExpenseNew>,
) -> Result<ApiOk<ExpenseCreated>, ServerError> {
    let cmd = CreateExpenseCmd {
        org_id,
        project_id,
        party_id: payload.party_id,
        stage_id: payload.stage_id,
        category_id: payload.category_id,
        rate_minor: payload.rate_minor,
        quantity_milli: payload.quantity_milli,
        mode: payment_mode(payload.mode),
        expense_date: payload.expense_date,
        immediate_payment: payload.immediate_payment.map(|p| ImmediatePayment {
            amount_minor: p.amount_minor,
            mode: payment_mode(p.mode),
            reference_number: p.reference_number,
            notes: p.notes,
        }),
    };

    let (expense, payment) = state.ledger.new_expense(&user.username, cmd).await?;
    Ok(ApiOk::created(ExpenseCreated {
        expense: expense_view(expense),
        payment: payment.map(payment_view),
    }))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<ApiOk<Paginated<ExpenseView>>, ServerError> {
    let page = page_from(query.page, query.limit)?;
    let filter = ExpenseListFilter {
        party_id: query.party_id,
        stage_id: query.stage_id,
        category_id: query.category_id,
        status: query.status.map(expense_status),
        from: query.from,
        to: query.to,
    };

    let (expenses, total) = state
        .ledger
        .expenses(org_id, project_id, &user.username, filter, page)
        .await?;

    let items = expenses.into_iter().map(expense_view).collect();
    Ok(ApiOk::ok(paginated(items, page, total)))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<ExpenseView>, ServerError> {
    let expense = state
        .ledger
        .expense(org_id, expense_id, &user.username)
        .await?;
    Ok(ApiOk::ok(expense_view(expense)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<ApiOk<ExpenseView>, ServerError> {
    let expense = state
        .ledger
        .update_expense(
            org_id,
            expense_id,
            &user.username,
            payload.party_id.into(),
            payload.stage_id.into(),
            payload.category_id,
            payload.rate_minor,
            payload.quantity_milli,
            payload.mode.map(payment_mode),
            payload.expense_date,
        )
        .await?;
    Ok(ApiOk::ok(expense_view(expense)))
}

pub async fn approve(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<ExpenseView>, ServerError> {
    let expense = state
        .ledger
        .approve_expense(org_id, expense_id, &user.username)
        .await?;
    Ok(ApiOk::ok(expense_view(expense)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .delete_expense(org_id, expense_id, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
