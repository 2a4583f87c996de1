//! Common repository traits
//!
//! This module defines generic interfaces for database operations.
//! Every backend (MySQL, in-memory) implements them, so services only
//! ever see `Arc<dyn ...Store>`.

use super::StoreError;
use async_trait::async_trait;

/// Trait for creating new entities in the store
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the store)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
#[async_trait]
pub trait Create<Entity, CreateDTO: Sync> {
    /// Creates a new entity
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with ID assigned by the store
    /// * `Err(StoreError::UniqueViolation)` - A unique constraint rejected the row
    /// * `Err(StoreError)` - Any other backend failure
    async fn create(&self, data: &CreateDTO) -> Result<Entity, StoreError>;
}

/// Trait for reading a single entity by primary key
///
/// # Type Parameters
/// * `Entity` - Type of the entity to read
/// * `Id` - Type of the primary key
#[async_trait]
pub trait Read<Entity, Id: Sync> {
    /// Reads an entity by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    async fn read(&self, id: &Id) -> Result<Option<Entity>, StoreError>;
}

/// Trait for updating existing entities
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
/// * `UpdateDTO` - DTO for updating (optional fields for partial updates)
/// * `Id` - Type of the primary key
#[async_trait]
pub trait Update<Entity, UpdateDTO: Sync, Id: Sync> {
    /// Updates an existing entity, only `Some(_)` fields are modified
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Updated entity
    /// * `Ok(None)` - No entity with that ID
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Option<Entity>, StoreError>;
}

/// Trait for deleting entities
///
/// # Type Parameters
/// * `Entity` - Type of the deleted entity (selects the table when one store serves many)
/// * `Id` - Type of the primary key
///
/// Deletion cascades along the ownership chain (profile -> offers -> applications).
#[async_trait]
pub trait Delete<Entity, Id: Sync> {
    /// Deletes an entity
    ///
    /// # Returns
    /// * `Ok(true)` - Entity existed and was deleted
    /// * `Ok(false)` - No entity with that ID
    async fn delete(&self, id: &Id) -> Result<bool, StoreError>;
}
