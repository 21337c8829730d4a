use sea_orm::entity::prelude::*;

/// One generated track. Written once per generation call; afterwards only
/// `play_count` and `user_rating` change.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "generated_bgms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub audio_url: String,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    pub duration_seconds: i32,
    pub time_of_day: String,
    pub weather_condition: String,
    pub work_type: String,
    pub mood: String,
    pub bpm: i32,
    pub musical_key: String,
    pub genre: String,
    pub model: String,
    /// Music parameters the prompt was built from.
    pub parameters: Json,
    pub is_mock: bool,
    pub play_count: i32,
    pub user_rating: Option<i16>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::user_activities::Entity")]
    Activities,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::user_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
