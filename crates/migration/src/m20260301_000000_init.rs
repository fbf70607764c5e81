//! Initial schema migration - creates all tables from scratch.
//!
//! The complete schema for Girder:
//!
//! - `users`: authentication
//! - `organizations`: tenant boundary, owned by users
//! - `org_memberships`: multi-user organization access
//! - `projects`: construction projects with budget and dates
//! - `stages`: ordered project phases
//! - `categories`: org-level expense categories
//! - `parties`: vendors, labour, subcontractors, clients
//! - `expenses`: rate × quantity costs (the amount is derived, never stored)
//! - `payments`: IN/OUT cash movements, optionally settling an expense
//! - `member_advances`: cash handed to team members
//! - `tasks`: project task tracking
//! - `boq_items`: bill-of-quantities budget lines

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Organizations {
    Table,
    Id,
    Name,
    Owner,
}

#[derive(Iden)]
enum OrgMemberships {
    Table,
    OrgId,
    Username,
    Role,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    OrgId,
    Name,
    BudgetMinor,
    StartDate,
    EndDate,
    ClientPartyId,
    Status,
}

#[derive(Iden)]
enum Stages {
    Table,
    Id,
    OrgId,
    ProjectId,
    Name,
    Position,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    OrgId,
    Name,
}

#[derive(Iden)]
enum Parties {
    Table,
    Id,
    OrgId,
    Name,
    Phone,
    Location,
    Kind,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    OrgId,
    ProjectId,
    PartyId,
    StageId,
    CategoryId,
    RateMinor,
    QuantityMilli,
    Mode,
    ExpenseDate,
    Status,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    OrgId,
    ProjectId,
    PartyId,
    ExpenseId,
    RecordedBy,
    Kind,
    Mode,
    AmountMinor,
    PaymentDate,
    ReferenceNumber,
    Notes,
}

#[derive(Iden)]
enum MemberAdvances {
    Table,
    Id,
    OrgId,
    ProjectId,
    Member,
    AmountMinor,
    Purpose,
    Mode,
    AdvanceDate,
    ExpectedSettlementDate,
    Notes,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    OrgId,
    ProjectId,
    Title,
    Description,
    Status,
    DueDate,
    AssignedTo,
}

#[derive(Iden)]
enum BoqItems {
    Table,
    Id,
    OrgId,
    ProjectId,
    Name,
    Unit,
    RateMinor,
    QuantityMilli,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Organizations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .col(ColumnDef::new(Organizations::Owner).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-organizations-owner")
                            .from(Organizations::Table, Organizations::Owner)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Org Memberships
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(OrgMemberships::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrgMemberships::OrgId).string().not_null())
                    .col(
                        ColumnDef::new(OrgMemberships::Username)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrgMemberships::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(OrgMemberships::OrgId)
                            .col(OrgMemberships::Username),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-org_memberships-org_id")
                            .from(OrgMemberships::Table, OrgMemberships::OrgId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-org_memberships-username")
                            .from(OrgMemberships::Table, OrgMemberships::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-org_memberships-username")
                    .table(OrgMemberships::Table)
                    .col(OrgMemberships::Username)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Parties
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Parties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parties::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Parties::OrgId).string().not_null())
                    .col(ColumnDef::new(Parties::Name).string().not_null())
                    .col(ColumnDef::new(Parties::Phone).string())
                    .col(ColumnDef::new(Parties::Location).string())
                    .col(ColumnDef::new(Parties::Kind).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-parties-org_id")
                            .from(Parties::Table, Parties::OrgId)
                            .to(Organizations::Table, Organizations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-parties-org_id-kind")
                    .table(Parties::Table)
                    .col(Parties::OrgId)
                    .col(Parties::Kind)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Projects
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::OrgId).string().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(
                        ColumnDef::new(Projects::BudgetMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Projects::StartDate).date().not_null())
                    .col(ColumnDef::new(Projects::EndDate).date())
                    .col(ColumnDef::new(Projects::ClientPartyId).string())
                    .col(ColumnDef::new(Projects::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-org_id")
                            .from(Projects::Table, Projects::OrgId)
                            .to(Organizations::Table, Organizations::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-projects-client_party_id")
                            .from(Projects::Table, Projects::ClientPartyId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-projects-org_id-status")
                    .table(Projects::Table)
                    .col(Projects::OrgId)
                    .col(Projects::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Stages
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Stages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stages::OrgId).string().not_null())
                    .col(ColumnDef::new(Stages::ProjectId).string().not_null())
                    .col(ColumnDef::new(Stages::Name).string().not_null())
                    .col(ColumnDef::new(Stages::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-stages-project_id")
                            .from(Stages::Table, Stages::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stages-project_id")
                    .table(Stages::Table)
                    .col(Stages::ProjectId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::OrgId).string().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-org_id")
                            .from(Categories::Table, Categories::OrgId)
                            .to(Organizations::Table, Organizations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-org_id-name-unique")
                    .table(Categories::Table)
                    .col(Categories::OrgId)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::OrgId).string().not_null())
                    .col(ColumnDef::new(Expenses::ProjectId).string().not_null())
                    .col(ColumnDef::new(Expenses::PartyId).string())
                    .col(ColumnDef::new(Expenses::StageId).string())
                    .col(ColumnDef::new(Expenses::CategoryId).string().not_null())
                    .col(ColumnDef::new(Expenses::RateMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Expenses::QuantityMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Mode).string().not_null())
                    .col(ColumnDef::new(Expenses::ExpenseDate).date().not_null())
                    .col(ColumnDef::new(Expenses::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-project_id")
                            .from(Expenses::Table, Expenses::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-category_id")
                            .from(Expenses::Table, Expenses::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-project_id-expense_date")
                    .table(Expenses::Table)
                    .col(Expenses::ProjectId)
                    .col(Expenses::ExpenseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-party_id")
                    .table(Expenses::Table)
                    .col(Expenses::PartyId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::OrgId).string().not_null())
                    .col(ColumnDef::new(Payments::ProjectId).string().not_null())
                    .col(ColumnDef::new(Payments::PartyId).string())
                    .col(ColumnDef::new(Payments::ExpenseId).string())
                    .col(ColumnDef::new(Payments::RecordedBy).string())
                    .col(ColumnDef::new(Payments::Kind).string().not_null())
                    .col(ColumnDef::new(Payments::Mode).string().not_null())
                    .col(
                        ColumnDef::new(Payments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::PaymentDate).date().not_null())
                    .col(ColumnDef::new(Payments::ReferenceNumber).string())
                    .col(ColumnDef::new(Payments::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-project_id")
                            .from(Payments::Table, Payments::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-expense_id")
                            .from(Payments::Table, Payments::ExpenseId)
                            .to(Expenses::Table, Expenses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-project_id-payment_date")
                    .table(Payments::Table)
                    .col(Payments::ProjectId)
                    .col(Payments::PaymentDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-party_id")
                    .table(Payments::Table)
                    .col(Payments::PartyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-expense_id")
                    .table(Payments::Table)
                    .col(Payments::ExpenseId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Member Advances
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MemberAdvances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MemberAdvances::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MemberAdvances::OrgId).string().not_null())
                    .col(
                        ColumnDef::new(MemberAdvances::ProjectId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MemberAdvances::Member).string().not_null())
                    .col(
                        ColumnDef::new(MemberAdvances::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MemberAdvances::Purpose).string().not_null())
                    .col(ColumnDef::new(MemberAdvances::Mode).string().not_null())
                    .col(
                        ColumnDef::new(MemberAdvances::AdvanceDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MemberAdvances::ExpectedSettlementDate).date())
                    .col(ColumnDef::new(MemberAdvances::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-member_advances-project_id")
                            .from(MemberAdvances::Table, MemberAdvances::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-member_advances-member")
                            .from(MemberAdvances::Table, MemberAdvances::Member)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-member_advances-project_id-member")
                    .table(MemberAdvances::Table)
                    .col(MemberAdvances::ProjectId)
                    .col(MemberAdvances::Member)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 11. Tasks
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::OrgId).string().not_null())
                    .col(ColumnDef::new(Tasks::ProjectId).string().not_null())
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).string())
                    .col(ColumnDef::new(Tasks::Status).string().not_null())
                    .col(ColumnDef::new(Tasks::DueDate).date())
                    .col(ColumnDef::new(Tasks::AssignedTo).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-project_id")
                            .from(Tasks::Table, Tasks::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tasks-project_id-status")
                    .table(Tasks::Table)
                    .col(Tasks::ProjectId)
                    .col(Tasks::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 12. BOQ Items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BoqItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BoqItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BoqItems::OrgId).string().not_null())
                    .col(ColumnDef::new(BoqItems::ProjectId).string().not_null())
                    .col(ColumnDef::new(BoqItems::Name).string().not_null())
                    .col(ColumnDef::new(BoqItems::Unit).string().not_null())
                    .col(
                        ColumnDef::new(BoqItems::RateMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BoqItems::QuantityMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-boq_items-project_id")
                            .from(BoqItems::Table, BoqItems::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-boq_items-project_id")
                    .table(BoqItems::Table)
                    .col(BoqItems::ProjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(BoqItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MemberAdvances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrgMemberships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
