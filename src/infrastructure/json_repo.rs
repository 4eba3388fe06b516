use async_trait::async_trait;

use crate::domain::{
    error::StorageError,
    repository::{TodoRepository, UserRepository},
    todo::{Todo, TodoId},
    user::User,
};

use super::json_store::JsonStore;

pub const USERS_FILE: &str = "users.json";
pub const TODOS_FILE: &str = "todos.json";

#[derive(Clone)]
pub struct JsonUserRepository {
    store: JsonStore,
}

impl JsonUserRepository {
    pub fn new(store: JsonStore) -> Self { Self { store } }
}

#[async_trait]
impl UserRepository for JsonUserRepository {
    async fn init(&self) -> Result<(), StorageError> {
        self.store.init(USERS_FILE)?;
        // A corrupted collection aborts the session here rather than on
        // the first login attempt.
        self.store.load::<User>(USERS_FILE)?;
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<User>, StorageError> {
        let users: Vec<User> = self.store.load(USERS_FILE)?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn insert(&self, user: User) -> Result<User, StorageError> {
        let mut users: Vec<User> = self.store.load(USERS_FILE)?;
        users.push(user.clone());
        self.store.save(USERS_FILE, &users)?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct JsonTodoRepository {
    store: JsonStore,
}

impl JsonTodoRepository {
    pub fn new(store: JsonStore) -> Self { Self { store } }
}

#[async_trait]
impl TodoRepository for JsonTodoRepository {
    async fn init(&self) -> Result<(), StorageError> {
        self.store.init(TODOS_FILE)?;
        self.store.load::<Todo>(TODOS_FILE)?;
        Ok(())
    }

    async fn insert(&self, todo: Todo) -> Result<Todo, StorageError> {
        let mut todos: Vec<Todo> = self.store.load(TODOS_FILE)?;
        todos.push(todo.clone());
        self.store.save(TODOS_FILE, &todos)?;
        Ok(todo)
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>, StorageError> {
        let todos: Vec<Todo> = self.store.load(TODOS_FILE)?;
        Ok(todos.into_iter().find(|t| t.id == id))
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Todo>, StorageError> {
        let todos: Vec<Todo> = self.store.load(TODOS_FILE)?;
        Ok(todos.into_iter().filter(|t| t.owner == owner).collect())
    }

    async fn replace(&self, todo: Todo) -> Result<Option<Todo>, StorageError> {
        let mut todos: Vec<Todo> = self.store.load(TODOS_FILE)?;
        let Some(slot) = todos.iter_mut().find(|t| t.id == todo.id) else {
            return Ok(None);
        };
        *slot = todo.clone();
        self.store.save(TODOS_FILE, &todos)?;
        Ok(Some(todo))
    }
}
