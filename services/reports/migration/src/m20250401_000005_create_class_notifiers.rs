use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClassNotifiers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassNotifiers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassNotifiers::ClassId).uuid().not_null())
                    .col(ColumnDef::new(ClassNotifiers::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(ClassNotifiers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassNotifiers::Table, ClassNotifiers::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassNotifiers::Table, ClassNotifiers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ClassNotifiers::Table)
                    .col(ClassNotifiers::ClassId)
                    .col(ClassNotifiers::UserId)
                    .unique()
                    .name("uq_class_notifiers_class_id_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClassNotifiers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClassNotifiers {
    Table,
    Id,
    ClassId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Classes {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
