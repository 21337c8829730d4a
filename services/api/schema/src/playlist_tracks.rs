use sea_orm::entity::prelude::*;

/// Track slot in a playlist. `(playlist_id, bgm_id)` is unique; `position`
/// is 0-based.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "playlist_tracks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub playlist_id: Uuid,
    pub bgm_id: Uuid,
    pub position: i32,
    pub added_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::playlists::Entity",
        from = "Column::PlaylistId",
        to = "super::playlists::Column::Id",
        on_delete = "Cascade"
    )]
    Playlist,
    #[sea_orm(
        belongs_to = "super::generated_bgms::Entity",
        from = "Column::BgmId",
        to = "super::generated_bgms::Column::Id",
        on_delete = "Cascade"
    )]
    Bgm,
}

impl Related<super::playlists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Playlist.def()
    }
}

impl Related<super::generated_bgms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bgm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
