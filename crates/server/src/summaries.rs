//! Read-only financial summary endpoints. All figures are computed by the
//! ledger's aggregator from org-scoped rows; handlers only reshape them.

use axum::{
    Extension,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use api_types::summary::{
    AdvanceSummaryView, CategoryTotalView, CreditsBucketView, CreditsSummaryView,
    PartyOutstanding, ProjectFinanceView, UnpaidExpenseView,
};
use ledger::summary::CreditsBucket;

use crate::{ApiOk, ServerError, convert::expense_view, server::ServerState, user};

#[derive(Debug, Default, Deserialize)]
pub struct OutstandingQuery {
    /// "Pending" display: floor an overpaid (negative) balance at zero.
    /// The stored balance itself is never clamped.
    pub pending_only: Option<bool>,
}

pub async fn party_outstanding(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id, party_id)): Path<(Uuid, Uuid, Uuid)>,
    Query(query): Query<OutstandingQuery>,
) -> Result<ApiOk<PartyOutstanding>, ServerError> {
    let mut outstanding_minor = state
        .ledger
        .party_outstanding(org_id, project_id, party_id, &user.username)
        .await?;
    if query.pending_only.unwrap_or(false) {
        outstanding_minor = outstanding_minor.max(0);
    }

    Ok(ApiOk::ok(PartyOutstanding {
        party_id,
        outstanding_minor,
    }))
}

pub async fn unpaid_expenses(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id, party_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<ApiOk<Vec<UnpaidExpenseView>>, ServerError> {
    let unpaid = state
        .ledger
        .unpaid_expenses(org_id, project_id, party_id, &user.username)
        .await?
        .into_iter()
        .map(|row| UnpaidExpenseView {
            expense: expense_view(row.expense),
            unpaid_minor: row.unpaid_minor,
        })
        .collect();

    Ok(ApiOk::ok(unpaid))
}

pub async fn expenses_by_category(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<Vec<CategoryTotalView>>, ServerError> {
    let mut totals: Vec<CategoryTotalView> = state
        .ledger
        .expenses_by_category(org_id, project_id, &user.username)
        .await?
        .into_iter()
        .map(|(category_id, total)| CategoryTotalView {
            category_id,
            name: total.name,
            total_minor: total.total_minor,
            count: total.count,
        })
        .collect();
    totals.sort_by(|a, b| b.total_minor.cmp(&a.total_minor));

    Ok(ApiOk::ok(totals))
}

pub async fn member_advance_summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id, member)): Path<(Uuid, Uuid, String)>,
) -> Result<ApiOk<AdvanceSummaryView>, ServerError> {
    let summary = state
        .ledger
        .member_advance_summary(org_id, project_id, &member, &user.username)
        .await?;

    Ok(ApiOk::ok(AdvanceSummaryView {
        member,
        total_advanced_minor: summary.total_advanced_minor,
        balance_minor: summary.balance_minor,
    }))
}

pub async fn project_finance(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((org_id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiOk<ProjectFinanceView>, ServerError> {
    let finance = state
        .ledger
        .project_finance(org_id, project_id, &user.username)
        .await?;

    Ok(ApiOk::ok(ProjectFinanceView {
        total_expenses_minor: finance.summary.total_expenses_minor,
        total_in_minor: finance.summary.total_in_minor,
        total_out_minor: finance.summary.total_out_minor,
        balance_minor: finance.summary.balance_minor,
        budget_minor: finance.budget_minor,
        budget_used_percent: finance.budget_used_percent,
    }))
}

fn bucket_view(bucket: CreditsBucket) -> CreditsBucketView {
    CreditsBucketView {
        count: bucket.count,
        balance_minor: bucket.balance_minor,
    }
}

pub async fn credits_summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(org_id): Path<Uuid>,
) -> Result<ApiOk<CreditsSummaryView>, ServerError> {
    let credits = state.ledger.credits_summary(org_id, &user.username).await?;

    Ok(ApiOk::ok(CreditsSummaryView {
        vendors: bucket_view(credits.vendors),
        labours: bucket_view(credits.labours),
        subcontractors: bucket_view(credits.subcontractors),
        total_minor: credits.total_minor,
    }))
}
