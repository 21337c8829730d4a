use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserActivities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserActivities::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserActivities::BgmId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserActivities::ActivityType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserActivities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserActivities::Table, UserActivities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserActivities::Table, UserActivities::BgmId)
                            .to(GeneratedBgms::Table, GeneratedBgms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserActivities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserActivities {
    Table,
    Id,
    UserId,
    BgmId,
    ActivityType,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum GeneratedBgms {
    Table,
    Id,
}
