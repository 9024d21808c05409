//! Migration: Create applications table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Applications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Applications::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Applications::ScholarshipId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Applications::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Applications::ReviewedBy).big_integer().null())
                    .col(ColumnDef::new(Applications::Remarks).text().null())
                    .col(ColumnDef::new(Applications::IncomeProofPath).string_len(255).null())
                    .col(ColumnDef::new(Applications::GovtIdPath).string_len(255).null())
                    .col(
                        ColumnDef::new(Applications::CgpaValue)
                            .double()
                            .null()
                            .check(Expr::cust(
                                "cgpa_value IS NULL OR (cgpa_value >= 0 AND cgpa_value <= 10)",
                            )),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Applications::Table, Applications::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Applications::Table, Applications::ScholarshipId)
                            .to(Scholarships::Table, Scholarships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Applications::Table, Applications::ReviewedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per (student, scholarship)
        manager
            .create_index(
                Index::create()
                    .name("idx_applications_student_scholarship")
                    .table(Applications::Table)
                    .col(Applications::StudentId)
                    .col(Applications::ScholarshipId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_status_submitted")
                    .table(Applications::Table)
                    .col(Applications::Status)
                    .col(Applications::SubmittedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Applications {
    Table,
    Id,
    #[iden = "student_id"]
    StudentId,
    #[iden = "scholarship_id"]
    ScholarshipId,
    Status,
    #[iden = "submitted_at"]
    SubmittedAt,
    #[iden = "reviewed_by"]
    ReviewedBy,
    Remarks,
    #[iden = "income_proof_path"]
    IncomeProofPath,
    #[iden = "govt_id_path"]
    GovtIdPath,
    #[iden = "cgpa_value"]
    CgpaValue,
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
}

#[derive(Iden)]
pub enum Scholarships {
    Table,
    Id,
}
