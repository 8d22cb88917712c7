//! Create voter_ids table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_employees::Employees;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoterIds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoterIds::VoterId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VoterIds::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(VoterIds::VoterNumber).string())
                    .col(ColumnDef::new(VoterIds::City).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voter_ids_employee")
                            .from(VoterIds::Table, VoterIds::EmployeeId)
                            .to(Employees::Table, Employees::EmployeeId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One voter record per employee
        manager
            .create_index(
                Index::create()
                    .name("idx_voter_ids_employee_id")
                    .table(VoterIds::Table)
                    .col(VoterIds::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoterIds::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum VoterIds {
    Table,
    VoterId,
    EmployeeId,
    VoterNumber,
    City,
}
