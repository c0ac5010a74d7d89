use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait HasCreatedAtColumn: sea_orm::EntityTrait {
    fn created_at_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}

/// Wires an entity with `id`, `created_at` and `updated_at` columns into the DAO traits.
macro_rules! timestamped_entity {
    ($($module:ident),+ $(,)?) => {
        $(
            const _: () = {
                use $crate::db::entities::$module as entity;
                use sea_orm::{ActiveValue::Set, entity::prelude::DateTimeWithTimeZone};

                impl $crate::db::dao::HasIdActiveModel for entity::ActiveModel {
                    fn set_id(&mut self, id: uuid::Uuid) {
                        self.id = Set(id);
                    }
                }

                impl $crate::db::dao::TimestampedActiveModel for entity::ActiveModel {
                    fn set_created_at(&mut self, ts: DateTimeWithTimeZone) {
                        self.created_at = Set(ts);
                    }

                    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone) {
                        self.updated_at = Set(ts);
                    }
                }

                impl $crate::db::dao::HasCreatedAtColumn for entity::Entity {
                    fn created_at_column() -> entity::Column {
                        entity::Column::CreatedAt
                    }
                }
            };
        )+
    };
}

timestamped_entity!(user, refresh_token, password_reset_token);
