//! Repository Layer - Core Traits

use async_trait::async_trait;
use crate::domain::{DomainError, DomainResult, Entity};

/// CRUD access to one entity table
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn create(&self, entity: &T) -> DomainResult<T>;

    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// All rows, in the table's natural order (stations by id, queue items by rank)
    async fn list(&self) -> DomainResult<Vec<T>>;

    async fn update(&self, entity: &T) -> DomainResult<T>;

    async fn delete(&self, id: T::Id) -> DomainResult<()>;

    /// Like `find_by_id`, but a missing row is `NotFound`
    async fn get(&self, id: T::Id) -> DomainResult<T> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("{} {}", T::KIND, id)))
    }
}
