use async_trait::async_trait;

use super::error::StorageError;
use super::todo::{Todo, TodoId};
use super::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn init(&self) -> Result<(), StorageError>;
    async fn find(&self, username: &str) -> Result<Option<User>, StorageError>;
    async fn insert(&self, user: User) -> Result<User, StorageError>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> Result<(), StorageError>;
    async fn insert(&self, todo: Todo) -> Result<Todo, StorageError>;
    async fn get(&self, id: TodoId) -> Result<Option<Todo>, StorageError>;
    /// Items for one owner, in insertion order of the collection.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Todo>, StorageError>;
    /// Swap the stored record with the same id; `None` if no such id.
    async fn replace(&self, todo: Todo) -> Result<Option<Todo>, StorageError>;
}
