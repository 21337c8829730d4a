use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(GeneratedBgms::Table)
                    .col(GeneratedBgms::UserId)
                    .col(GeneratedBgms::CreatedAt)
                    .name("idx_generated_bgms_user_id_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(UserActivities::Table)
                    .col(UserActivities::UserId)
                    .name("idx_user_activities_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Playlists::Table)
                    .col(Playlists::UserId)
                    .name("idx_playlists_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_playlists_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_activities_user_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_generated_bgms_user_id_created_at")
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum GeneratedBgms {
    Table,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum UserActivities {
    Table,
    UserId,
}

#[derive(Iden)]
enum Playlists {
    Table,
    UserId,
}
