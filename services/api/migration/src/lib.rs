use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_user_profiles;
mod m20260301_000003_create_generated_bgms;
mod m20260301_000004_create_user_activities;
mod m20260301_000005_create_playlists;
mod m20260301_000006_create_playlist_tracks;
mod m20260301_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_user_profiles::Migration),
            Box::new(m20260301_000003_create_generated_bgms::Migration),
            Box::new(m20260301_000004_create_user_activities::Migration),
            Box::new(m20260301_000005_create_playlists::Migration),
            Box::new(m20260301_000006_create_playlist_tracks::Migration),
            Box::new(m20260301_000007_add_indexes::Migration),
        ]
    }
}
