use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::ClassId).uuid().not_null())
                    .col(ColumnDef::new(Assignments::DirectoryId).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::ExternalAssignmentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::OpenAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::DueAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Assignments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Assignments::Status).is_in(["opened", "deleted"]))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Concurrent first reports for the same pair race on this index;
        // the loser re-reads and updates instead of inserting.
        manager
            .create_index(
                Index::create()
                    .table(Assignments::Table)
                    .col(Assignments::DirectoryId)
                    .col(Assignments::ExternalAssignmentId)
                    .unique()
                    .name("uq_assignments_directory_id_external_assignment_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Assignments::Table)
                    .col(Assignments::ClassId)
                    .col(Assignments::DueAt)
                    .name("idx_assignments_class_id_due_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Assignments {
    Table,
    Id,
    ClassId,
    DirectoryId,
    ExternalAssignmentId,
    OpenAt,
    DueAt,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Classes {
    Table,
    Id,
}
