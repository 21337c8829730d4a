use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GeneratedBgms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedBgms::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GeneratedBgms::UserId).uuid().not_null())
                    .col(ColumnDef::new(GeneratedBgms::Title).string_len(255).not_null())
                    .col(ColumnDef::new(GeneratedBgms::AudioUrl).text().not_null())
                    .col(ColumnDef::new(GeneratedBgms::Prompt).text().not_null())
                    .col(
                        ColumnDef::new(GeneratedBgms::DurationSeconds)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedBgms::TimeOfDay)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedBgms::WeatherCondition)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedBgms::WorkType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GeneratedBgms::Mood).string_len(64).not_null())
                    .col(ColumnDef::new(GeneratedBgms::Bpm).integer().not_null())
                    .col(
                        ColumnDef::new(GeneratedBgms::MusicalKey)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GeneratedBgms::Genre).string_len(64).not_null())
                    .col(ColumnDef::new(GeneratedBgms::Model).string_len(128).not_null())
                    .col(
                        ColumnDef::new(GeneratedBgms::Parameters)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedBgms::IsMock)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GeneratedBgms::PlayCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GeneratedBgms::UserRating)
                            .small_integer()
                            .check(
                                Expr::col(GeneratedBgms::UserRating)
                                    .between(1, 5)
                                    .or(Expr::col(GeneratedBgms::UserRating).is_null()),
                            ),
                    )
                    .col(
                        ColumnDef::new(GeneratedBgms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GeneratedBgms::Table, GeneratedBgms::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneratedBgms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GeneratedBgms {
    Table,
    Id,
    UserId,
    Title,
    AudioUrl,
    Prompt,
    DurationSeconds,
    TimeOfDay,
    WeatherCondition,
    WorkType,
    Mood,
    Bpm,
    MusicalKey,
    Genre,
    Model,
    Parameters,
    IsMock,
    PlayCount,
    UserRating,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
