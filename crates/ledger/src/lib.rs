pub use advances::MemberAdvance;
pub use boq::BoqItem;
pub use categories::Category;
pub use error::LedgerError;
pub use expenses::{Expense, ExpenseStatus};
pub use org_memberships::OrgRole;
pub use organizations::Organization;
pub use parties::{Party, PartyKind};
pub use patch::Patch;
pub use payments::{Payment, PaymentKind, PaymentMode};
pub use projects::{Project, ProjectStatus};
pub use stages::Stage;
pub use tasks::{Task, TaskStatus};

pub use ops::{
    CreateExpenseCmd, CreatePaymentCmd, ExpenseListFilter, ImmediatePayment, Ledger,
    LedgerBuilder, Page, PaymentListFilter, ProjectFinance,
};

mod advances;
mod boq;
mod categories;
mod error;
mod expenses;
pub mod money;
mod ops;
mod org_memberships;
mod organizations;
mod parties;
mod patch;
mod payments;
mod projects;
mod stages;
pub mod summary;
mod tasks;
mod users;

type ResultLedger<T> = Result<T, LedgerError>;
