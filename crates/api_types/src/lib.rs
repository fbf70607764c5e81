use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    In,
    Out,
}

impl PaymentKind {
    /// Returns the canonical kind string used by the ledger/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Cash,
    Cheque,
    Online,
}

impl PaymentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Cheque => "CHEQUE",
            Self::Online => "ONLINE",
        }
    }
}

pub mod common {
    use super::*;

    /// A page of rows plus the figures needed to render a pager.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Paginated<T> {
        pub items: Vec<T>,
        pub page: u64,
        pub limit: u64,
        pub total: u64,
        pub pages: u64,
    }
}

pub mod org {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrgNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrgView {
        pub id: Uuid,
        pub name: String,
        pub owner: String,
    }
}

pub mod membership {
    use super::*;

    /// Role of a user in an organization.
    ///
    /// The server treats roles as:
    /// - `owner`: full access and can manage members.
    /// - `editor`: can write but cannot manage members.
    /// - `viewer`: read-only.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MembershipRole {
        Owner,
        Editor,
        Viewer,
    }

    impl MembershipRole {
        /// Returns the canonical role string used by the ledger/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Owner => "owner",
                Self::Editor => "editor",
                Self::Viewer => "viewer",
            }
        }
    }

    /// Request body for adding/updating a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberUpsert {
        pub username: String,
        pub role: MembershipRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub username: String,
        pub role: MembershipRole,
    }
}

pub mod project {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum ProjectStatus {
        Active,
        OnHold,
        Completed,
    }

    impl ProjectStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Active => "ACTIVE",
                Self::OnHold => "ON_HOLD",
                Self::Completed => "COMPLETED",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub name: String,
        pub budget_minor: i64,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub client_party_id: Option<Uuid>,
    }

    /// PATCH body. Nullable fields use double options: absent means keep,
    /// `null` means clear, a value means set.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProjectUpdate {
        pub name: Option<String>,
        pub budget_minor: Option<i64>,
        pub start_date: Option<NaiveDate>,
        #[serde(default, with = "crate::double_option")]
        pub end_date: Option<Option<NaiveDate>>,
        #[serde(default, with = "crate::double_option")]
        pub client_party_id: Option<Option<Uuid>>,
        pub status: Option<ProjectStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
        pub id: Uuid,
        pub name: String,
        pub budget_minor: i64,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
        pub client_party_id: Option<Uuid>,
        pub status: ProjectStatus,
    }

    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct ProjectListQuery {
        pub status: Option<ProjectStatus>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }
}

pub mod stage {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StageNew {
        pub name: String,
        pub position: i32,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StageUpdate {
        pub name: Option<String>,
        pub position: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StageView {
        pub id: Uuid,
        pub project_id: Uuid,
        pub name: String,
        pub position: i32,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRename {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
    }
}

pub mod party {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum PartyKind {
        Vendor,
        Labour,
        Subcontractor,
        Client,
    }

    impl PartyKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Vendor => "VENDOR",
                Self::Labour => "LABOUR",
                Self::Subcontractor => "SUBCONTRACTOR",
                Self::Client => "CLIENT",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartyNew {
        pub name: String,
        pub phone: Option<String>,
        pub location: Option<String>,
        pub kind: PartyKind,
    }

    /// PATCH body; see [`crate::project::ProjectUpdate`] for the double-option
    /// convention.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PartyUpdate {
        pub name: Option<String>,
        #[serde(default, with = "crate::double_option")]
        pub phone: Option<Option<String>>,
        #[serde(default, with = "crate::double_option")]
        pub location: Option<Option<String>>,
        pub kind: Option<PartyKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartyView {
        pub id: Uuid,
        pub name: String,
        pub phone: Option<String>,
        pub location: Option<String>,
        pub kind: PartyKind,
    }

    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct PartyListQuery {
        pub kind: Option<PartyKind>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum ExpenseStatus {
        Pending,
        Approved,
    }

    impl ExpenseStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "PENDING",
                Self::Approved => "APPROVED",
            }
        }
    }

    /// Settle (part of) the expense at creation time with one OUT payment,
    /// written atomically with the expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImmediatePaymentNew {
        pub amount_minor: i64,
        pub mode: PaymentMode,
        pub reference_number: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub party_id: Option<Uuid>,
        pub stage_id: Option<Uuid>,
        pub category_id: Uuid,
        /// Unit rate in minor units.
        pub rate_minor: i64,
        /// Quantity in thousandths of a unit.
        pub quantity_milli: i64,
        pub mode: PaymentMode,
        pub expense_date: NaiveDate,
        pub immediate_payment: Option<ImmediatePaymentNew>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        #[serde(default, with = "crate::double_option")]
        pub party_id: Option<Option<Uuid>>,
        #[serde(default, with = "crate::double_option")]
        pub stage_id: Option<Option<Uuid>>,
        pub category_id: Option<Uuid>,
        pub rate_minor: Option<i64>,
        pub quantity_milli: Option<i64>,
        pub mode: Option<PaymentMode>,
        pub expense_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub project_id: Uuid,
        pub party_id: Option<Uuid>,
        pub stage_id: Option<Uuid>,
        pub category_id: Uuid,
        pub rate_minor: i64,
        pub quantity_milli: i64,
        /// Derived `rate × quantity`, never stored.
        pub amount_minor: i64,
        pub mode: PaymentMode,
        pub expense_date: NaiveDate,
        pub status: ExpenseStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub expense: ExpenseView,
        pub payment: Option<super::payment::PaymentView>,
    }

    /// Date bounds are half-open: `[from, to)`.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub party_id: Option<Uuid>,
        pub stage_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub status: Option<ExpenseStatus>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }
}

pub mod payment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub party_id: Option<Uuid>,
        /// OUT only: the expense this payment settles.
        pub expense_id: Option<Uuid>,
        pub kind: PaymentKind,
        pub mode: PaymentMode,
        pub amount_minor: i64,
        pub payment_date: NaiveDate,
        pub reference_number: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: Uuid,
        pub project_id: Uuid,
        pub party_id: Option<Uuid>,
        pub expense_id: Option<Uuid>,
        pub recorded_by: Option<String>,
        pub kind: PaymentKind,
        pub mode: PaymentMode,
        pub amount_minor: i64,
        pub payment_date: NaiveDate,
        pub reference_number: Option<String>,
        pub notes: Option<String>,
    }

    /// Date bounds are half-open: `[from, to)`.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct PaymentListQuery {
        pub party_id: Option<Uuid>,
        pub kind: Option<PaymentKind>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }
}

pub mod advance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdvanceNew {
        pub member: String,
        pub amount_minor: i64,
        pub purpose: String,
        pub mode: PaymentMode,
        pub advance_date: NaiveDate,
        pub expected_settlement_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    /// PATCH body; see [`crate::project::ProjectUpdate`] for the double-option
    /// convention.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AdvanceUpdate {
        pub amount_minor: Option<i64>,
        pub purpose: Option<String>,
        pub mode: Option<PaymentMode>,
        pub advance_date: Option<NaiveDate>,
        #[serde(default, with = "crate::double_option")]
        pub expected_settlement_date: Option<Option<NaiveDate>>,
        #[serde(default, with = "crate::double_option")]
        pub notes: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdvanceView {
        pub id: Uuid,
        pub project_id: Uuid,
        pub member: String,
        pub amount_minor: i64,
        pub purpose: String,
        pub mode: PaymentMode,
        pub advance_date: NaiveDate,
        pub expected_settlement_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct AdvanceListQuery {
        pub member: Option<String>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }
}

pub mod task {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TaskStatus {
        NotStarted,
        InProgress,
        Completed,
        OnHold,
        Blocked,
    }

    impl TaskStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::NotStarted => "NOT_STARTED",
                Self::InProgress => "IN_PROGRESS",
                Self::Completed => "COMPLETED",
                Self::OnHold => "ON_HOLD",
                Self::Blocked => "BLOCKED",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskNew {
        pub title: String,
        pub description: Option<String>,
        pub due_date: Option<NaiveDate>,
        pub assigned_to: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TaskUpdate {
        pub title: Option<String>,
        #[serde(default, with = "crate::double_option")]
        pub description: Option<Option<String>>,
        pub status: Option<TaskStatus>,
        #[serde(default, with = "crate::double_option")]
        pub due_date: Option<Option<NaiveDate>>,
        #[serde(default, with = "crate::double_option")]
        pub assigned_to: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskView {
        pub id: Uuid,
        pub project_id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub status: TaskStatus,
        pub due_date: Option<NaiveDate>,
        pub assigned_to: Option<String>,
    }

    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct TaskListQuery {
        pub status: Option<TaskStatus>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }
}

pub mod boq {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BoqItemNew {
        pub name: String,
        pub unit: String,
        pub rate_minor: i64,
        pub quantity_milli: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BoqItemUpdate {
        pub name: Option<String>,
        pub unit: Option<String>,
        pub rate_minor: Option<i64>,
        pub quantity_milli: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BoqItemView {
        pub id: Uuid,
        pub project_id: Uuid,
        pub name: String,
        pub unit: String,
        pub rate_minor: i64,
        pub quantity_milli: i64,
        /// Derived `rate × quantity`, never stored.
        pub amount_minor: i64,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartyOutstanding {
        pub party_id: Uuid,
        /// Raw signed balance; negative means the party was overpaid.
        pub outstanding_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnpaidExpenseView {
        pub expense: super::expense::ExpenseView,
        pub unpaid_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub category_id: Uuid,
        pub name: String,
        pub total_minor: i64,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdvanceSummaryView {
        pub member: String,
        pub total_advanced_minor: i64,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectFinanceView {
        pub total_expenses_minor: i64,
        pub total_in_minor: i64,
        pub total_out_minor: i64,
        pub balance_minor: i64,
        pub budget_minor: i64,
        pub budget_used_percent: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditsBucketView {
        pub count: u64,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CreditsSummaryView {
        pub vendors: CreditsBucketView,
        pub labours: CreditsBucketView,
        pub subcontractors: CreditsBucketView,
        pub total_minor: i64,
    }
}

/// Serde adapter for `Option<Option<T>>` PATCH fields: a missing key stays
/// `None`, an explicit `null` becomes `Some(None)`, a value `Some(Some(v))`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            None => serializer.serialize_none(),
            Some(inner) => inner.serialize(serializer),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
