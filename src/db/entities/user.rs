use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<Date>,
    pub role: String,
    pub is_banned: bool,
    pub is_verified: bool,
    pub auth_provider: String,
    #[sea_orm(indexed)]
    pub auth_provider_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(has_many)]
    pub refresh_tokens: HasMany<super::refresh_token::Entity>,
    #[sea_orm(has_many)]
    pub password_reset_tokens: HasMany<super::password_reset_token::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
