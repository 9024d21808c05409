//! Migration: Create finance table (one budget row per calendar year)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Finance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Finance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Finance::Year).integer().not_null().unique_key())
                    .col(
                        ColumnDef::new(Finance::BudgetAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Finance::AllocatedAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Finance::BalanceAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Finance::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Finance {
    Table,
    Id,
    Year,
    #[iden = "budget_amount"]
    BudgetAmount,
    #[iden = "allocated_amount"]
    AllocatedAmount,
    #[iden = "balance_amount"]
    BalanceAmount,
}
