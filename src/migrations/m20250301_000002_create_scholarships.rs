//! Migration: Create scholarships table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scholarships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scholarships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scholarships::Name).string_len(150).not_null())
                    .col(ColumnDef::new(Scholarships::Category).string_len(50).not_null())
                    .col(ColumnDef::new(Scholarships::Eligibility).text().not_null())
                    .col(ColumnDef::new(Scholarships::Amount).double().not_null())
                    .col(ColumnDef::new(Scholarships::StartDate).date().not_null())
                    .col(ColumnDef::new(Scholarships::EndDate).date().not_null())
                    .col(ColumnDef::new(Scholarships::MinCgpa).double().null())
                    .col(ColumnDef::new(Scholarships::IncomeLimit).double().null())
                    .to_owned(),
            )
            .await?;

        // The student listing filters and sorts on the window
        manager
            .create_index(
                Index::create()
                    .name("idx_scholarships_window")
                    .table(Scholarships::Table)
                    .col(Scholarships::StartDate)
                    .col(Scholarships::EndDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scholarships::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Scholarships {
    Table,
    Id,
    Name,
    Category,
    Eligibility,
    Amount,
    #[iden = "start_date"]
    StartDate,
    #[iden = "end_date"]
    EndDate,
    #[iden = "min_cgpa"]
    MinCgpa,
    #[iden = "income_limit"]
    IncomeLimit,
}
