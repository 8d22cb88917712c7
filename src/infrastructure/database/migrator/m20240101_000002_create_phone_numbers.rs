//! Create phone_numbers table

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
                    .table(PhoneNumbers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhoneNumbers::PhoneId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PhoneNumbers::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(PhoneNumbers::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(PhoneNumbers::Provider).string().not_null())
                    .col(ColumnDef::new(PhoneNumbers::PhoneType).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_phone_numbers_employee")
                            .from(PhoneNumbers::Table, PhoneNumbers::EmployeeId)
                            .to(Employees::Table, Employees::EmployeeId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_phone_numbers_employee_id")
                    .table(PhoneNumbers::Table)
                    .col(PhoneNumbers::EmployeeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PhoneNumbers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum PhoneNumbers {
    Table,
    PhoneId,
    EmployeeId,
    PhoneNumber,
    Provider,
    PhoneType,
}
