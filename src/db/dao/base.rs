use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityName, EntityTrait, FromQueryResult,
    IntoActiveModel, PrimaryKeyTrait, QueryOrder, Select,
};
use uuid::Uuid;

use super::base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

/// Shared CRUD for entities keyed by a UUID with `created_at`/`updated_at` columns.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity> + HasIdActiveModel + TimestampedActiveModel + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<Uuid> + Send + Sync,
    Self::Entity: HasCreatedAtColumn,
{
    type Entity: EntityTrait + Send + Sync;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    fn entity_name() -> &'static str {
        Self::Entity::default().table_name()
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_id(Uuid::new_v4());
        active.set_created_at(now);
        active.set_updated_at(now);
        active
            .insert(self.db())
            .await
            .map_err(|err| DaoLayerError::from_write(Self::entity_name(), err))
    }

    async fn find_by_id(&self, id: Uuid) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or(DaoLayerError::NotFound {
            entity: Self::entity_name(),
            id,
        })
    }

    /// Newest row matching `apply`, if any.
    async fn find_one(
        &self,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Option<<Self::Entity as EntityTrait>::Model>> {
        apply(Self::Entity::find())
            .order_by_desc(Self::Entity::created_at_column())
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let model = self.find_by_id(id).await?;

        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        active
            .update(self.db())
            .await
            .map_err(|err| DaoLayerError::from_write(Self::entity_name(), err))
    }

    async fn delete(&self, id: Uuid) -> DaoResult<Uuid> {
        let result = Self::Entity::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound {
                entity: Self::entity_name(),
                id,
            });
        }

        Ok(id)
    }
}
