//! Wire-to-ledger conversions shared by the handler modules.

use api_types::{
    advance::AdvanceView,
    boq::BoqItemView,
    category::CategoryView,
    common::Paginated,
    expense::{ExpenseStatus, ExpenseView},
    membership::MembershipRole,
    org::OrgView,
    party::{PartyKind, PartyView},
    payment::PaymentView,
    project::{ProjectStatus, ProjectView},
    stage::StageView,
    task::{TaskStatus, TaskView},
};
use ledger::Page;

use crate::ServerError;

pub(crate) fn payment_kind(kind: api_types::PaymentKind) -> ledger::PaymentKind {
    match kind {
        api_types::PaymentKind::In => ledger::PaymentKind::In,
        api_types::PaymentKind::Out => ledger::PaymentKind::Out,
    }
}

pub(crate) fn payment_kind_view(kind: ledger::PaymentKind) -> api_types::PaymentKind {
    match kind {
        ledger::PaymentKind::In => api_types::PaymentKind::In,
        ledger::PaymentKind::Out => api_types::PaymentKind::Out,
    }
}

pub(crate) fn payment_mode(mode: api_types::PaymentMode) -> ledger::PaymentMode {
    match mode {
        api_types::PaymentMode::Cash => ledger::PaymentMode::Cash,
        api_types::PaymentMode::Cheque => ledger::PaymentMode::Cheque,
        api_types::PaymentMode::Online => ledger::PaymentMode::Online,
    }
}

pub(crate) fn payment_mode_view(mode: ledger::PaymentMode) -> api_types::PaymentMode {
    match mode {
        ledger::PaymentMode::Cash => api_types::PaymentMode::Cash,
        ledger::PaymentMode::Cheque => api_types::PaymentMode::Cheque,
        ledger::PaymentMode::Online => api_types::PaymentMode::Online,
    }
}

pub(crate) fn party_kind(kind: PartyKind) -> ledger::PartyKind {
    match kind {
        PartyKind::Vendor => ledger::PartyKind::Vendor,
        PartyKind::Labour => ledger::PartyKind::Labour,
        PartyKind::Subcontractor => ledger::PartyKind::Subcontractor,
        PartyKind::Client => ledger::PartyKind::Client,
    }
}

pub(crate) fn party_kind_view(kind: ledger::PartyKind) -> PartyKind {
    match kind {
        ledger::PartyKind::Vendor => PartyKind::Vendor,
        ledger::PartyKind::Labour => PartyKind::Labour,
        ledger::PartyKind::Subcontractor => PartyKind::Subcontractor,
        ledger::PartyKind::Client => PartyKind::Client,
    }
}

pub(crate) fn project_status(status: ProjectStatus) -> ledger::ProjectStatus {
    match status {
        ProjectStatus::Active => ledger::ProjectStatus::Active,
        ProjectStatus::OnHold => ledger::ProjectStatus::OnHold,
        ProjectStatus::Completed => ledger::ProjectStatus::Completed,
    }
}

pub(crate) fn project_status_view(status: ledger::ProjectStatus) -> ProjectStatus {
    match status {
        ledger::ProjectStatus::Active => ProjectStatus::Active,
        ledger::ProjectStatus::OnHold => ProjectStatus::OnHold,
        ledger::ProjectStatus::Completed => ProjectStatus::Completed,
    }
}

pub(crate) fn expense_status(status: ExpenseStatus) -> ledger::ExpenseStatus {
    match status {
        ExpenseStatus::Pending => ledger::ExpenseStatus::Pending,
        ExpenseStatus::Approved => ledger::ExpenseStatus::Approved,
    }
}

pub(crate) fn expense_status_view(status: ledger::ExpenseStatus) -> ExpenseStatus {
    match status {
        ledger::ExpenseStatus::Pending => ExpenseStatus::Pending,
        ledger::ExpenseStatus::Approved => ExpenseStatus::Approved,
    }
}

pub(crate) fn task_status(status: TaskStatus) -> ledger::TaskStatus {
    match status {
        TaskStatus::NotStarted => ledger::TaskStatus::NotStarted,
        TaskStatus::InProgress => ledger::TaskStatus::InProgress,
        TaskStatus::Completed => ledger::TaskStatus::Completed,
        TaskStatus::OnHold => ledger::TaskStatus::OnHold,
        TaskStatus::Blocked => ledger::TaskStatus::Blocked,
    }
}

pub(crate) fn task_status_view(status: ledger::TaskStatus) -> TaskStatus {
    match status {
        ledger::TaskStatus::NotStarted => TaskStatus::NotStarted,
        ledger::TaskStatus::InProgress => TaskStatus::InProgress,
        ledger::TaskStatus::Completed => TaskStatus::Completed,
        ledger::TaskStatus::OnHold => TaskStatus::OnHold,
        ledger::TaskStatus::Blocked => TaskStatus::Blocked,
    }
}

pub(crate) fn org_role(role: MembershipRole) -> ledger::OrgRole {
    match role {
        MembershipRole::Owner => ledger::OrgRole::Owner,
        MembershipRole::Editor => ledger::OrgRole::Editor,
        MembershipRole::Viewer => ledger::OrgRole::Viewer,
    }
}

pub(crate) fn org_role_view(role: ledger::OrgRole) -> MembershipRole {
    match role {
        ledger::OrgRole::Owner => MembershipRole::Owner,
        ledger::OrgRole::Editor => MembershipRole::Editor,
        ledger::OrgRole::Viewer => MembershipRole::Viewer,
    }
}

// ─── View builders ──────────────────────────────────────────────────────────

pub(crate) fn org_view(org: ledger::Organization) -> OrgView {
    OrgView {
        id: org.id,
        name: org.name,
        owner: org.owner,
    }
}

pub(crate) fn project_view(project: ledger::Project) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        budget_minor: project.budget_minor,
        start_date: project.start_date,
        end_date: project.end_date,
        client_party_id: project.client_party_id,
        status: project_status_view(project.status),
    }
}

pub(crate) fn stage_view(stage: ledger::Stage) -> StageView {
    StageView {
        id: stage.id,
        project_id: stage.project_id,
        name: stage.name,
        position: stage.position,
    }
}

pub(crate) fn category_view(category: ledger::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
    }
}

pub(crate) fn party_view(party: ledger::Party) -> PartyView {
    PartyView {
        id: party.id,
        name: party.name,
        phone: party.phone,
        location: party.location,
        kind: party_kind_view(party.kind),
    }
}

pub(crate) fn expense_view(expense: ledger::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        project_id: expense.project_id,
        party_id: expense.party_id,
        stage_id: expense.stage_id,
        category_id: expense.category_id,
        rate_minor: expense.rate_minor,
        quantity_milli: expense.quantity_milli,
        amount_minor: expense.amount_minor,
        mode: payment_mode_view(expense.mode),
        expense_date: expense.expense_date,
        status: expense_status_view(expense.status),
    }
}

pub(crate) fn payment_view(payment: ledger::Payment) -> PaymentView {
    PaymentView {
        id: payment.id,
        project_id: payment.project_id,
        party_id: payment.party_id,
        expense_id: payment.expense_id,
        recorded_by: payment.recorded_by,
        kind: payment_kind_view(payment.kind),
        mode: payment_mode_view(payment.mode),
        amount_minor: payment.amount_minor,
        payment_date: payment.payment_date,
        reference_number: payment.reference_number,
        notes: payment.notes,
    }
}

pub(crate) fn advance_view(advance: ledger::MemberAdvance) -> AdvanceView {
    AdvanceView {
        id: advance.id,
        project_id: advance.project_id,
        member: advance.member,
        amount_minor: advance.amount_minor,
        purpose: advance.purpose,
        mode: payment_mode_view(advance.mode),
        advance_date: advance.advance_date,
        expected_settlement_date: advance.expected_settlement_date,
        notes: advance.notes,
    }
}

pub(crate) fn task_view(task: ledger::Task) -> TaskView {
    TaskView {
        id: task.id,
        project_id: task.project_id,
        title: task.title,
        description: task.description,
        status: task_status_view(task.status),
        due_date: task.due_date,
        assigned_to: task.assigned_to,
    }
}

pub(crate) fn boq_item_view(item: ledger::BoqItem) -> BoqItemView {
    BoqItemView {
        id: item.id,
        project_id: item.project_id,
        name: item.name,
        unit: item.unit,
        rate_minor: item.rate_minor,
        quantity_milli: item.quantity_milli,
        amount_minor: item.amount_minor,
    }
}

// ─── Pagination ─────────────────────────────────────────────────────────────

/// Resolves query-string paging: `limit` is clamped to `1..=100`, `page` 0
/// is rejected.
pub(crate) fn page_from(page: Option<u64>, limit: Option<u64>) -> Result<Page, ServerError> {
    let page = page.unwrap_or(1);
    if page == 0 {
        return Err(ServerError::Generic("page must be at least 1".to_string()));
    }
    let limit = limit.unwrap_or(20).clamp(1, 100);
    Ok(Page { page, limit })
}

pub(crate) fn paginated<T>(items: Vec<T>, page: Page, total: u64) -> Paginated<T> {
    // page_from never yields limit 0, but the division must not trust that.
    let limit = page.limit.max(1);
    Paginated {
        items,
        page: page.page,
        limit,
        total,
        pages: total.div_ceil(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_survives_a_zero_limit() {
        let page = Page { page: 1, limit: 0 };
        let out = paginated(vec![1, 2], page, 5);
        assert_eq!(out.limit, 1);
        assert_eq!(out.pages, 5);
    }

    #[test]
    fn page_count_rounds_up() {
        let page = Page { page: 2, limit: 20 };
        let out = paginated(Vec::<u32>::new(), page, 41);
        assert_eq!(out.pages, 3);
    }
}
