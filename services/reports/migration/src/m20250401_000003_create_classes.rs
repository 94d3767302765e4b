use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Classes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Classes::Term).string().not_null())
                    .col(ColumnDef::new(Classes::ExternalClassId).string().not_null())
                    .col(ColumnDef::new(Classes::CourseId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Classes::Table)
                    .col(Classes::Term)
                    .col(Classes::ExternalClassId)
                    .unique()
                    .name("uq_classes_term_external_class_id")
                    .to_owned(),
            )
            .await?;

        // Report ingestion resolves classes by external id alone.
        manager
            .create_index(
                Index::create()
                    .table(Classes::Table)
                    .col(Classes::ExternalClassId)
                    .name("idx_classes_external_class_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Classes {
    Table,
    Id,
    Term,
    ExternalClassId,
    CourseId,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
}
