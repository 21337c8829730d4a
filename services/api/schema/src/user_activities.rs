use sea_orm::entity::prelude::*;

/// Append-only interaction log (`generate`, `play`, `skip`, `like`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub bgm_id: Uuid,
    pub activity_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::generated_bgms::Entity",
        from = "Column::BgmId",
        to = "super::generated_bgms::Column::Id",
        on_delete = "Cascade"
    )]
    Bgm,
}

impl Related<super::generated_bgms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bgm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
