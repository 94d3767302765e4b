use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserDevices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserDevices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserDevices::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserDevices::FcmToken).string().not_null())
                    .col(ColumnDef::new(UserDevices::DeviceOs).string().not_null())
                    .col(
                        ColumnDef::new(UserDevices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserDevices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserDevices::Table, UserDevices::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(UserDevices::Table)
                    .col(UserDevices::UserId)
                    .col(UserDevices::FcmToken)
                    .unique()
                    .name("uq_user_devices_user_id_fcm_token")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserDevices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserDevices {
    Table,
    Id,
    UserId,
    FcmToken,
    DeviceOs,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
