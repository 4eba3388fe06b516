use async_trait::async_trait;
use chrono::Utc;

use crate::domain::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoId, TodoStatus, UpdateTodo};
use crate::domain::user::Session;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create(&self, session: &Session, input: CreateTodo) -> Result<Todo, TodoError>;
    async fn list_for_owner(&self, session: &Session) -> Result<Vec<Todo>, TodoError>;
    async fn get_detail(&self, session: &Session, id: TodoId) -> Result<Todo, TodoError>;
    async fn mark_completed(&self, session: &Session, id: TodoId) -> Result<Todo, TodoError>;
    async fn edit(&self, session: &Session, id: TodoId, input: UpdateTodo) -> Result<Todo, TodoError>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }

    /// Point lookup with the ownership check every per-item operation
    /// shares: unknown id is NotFound, someone else's item is Forbidden.
    async fn owned_item(&self, session: &Session, id: TodoId) -> Result<Todo, TodoError> {
        let Some(todo) = self.repo.get(id).await? else {
            return Err(TodoError::NotFound(id));
        };
        if todo.owner != session.username {
            return Err(TodoError::Forbidden(id));
        }
        Ok(todo)
    }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn create(&self, session: &Session, input: CreateTodo) -> Result<Todo, TodoError> {
        if input.title.trim().is_empty() {
            return Err(TodoError::Validation("title cannot be empty".into()));
        }
        let now = Utc::now();
        let todo = Todo {
            id: TodoId::default(),
            title: input.title,
            details: input.details,
            priority: input.priority,
            status: TodoStatus::Pending,
            owner: session.username.clone(),
            created_at: now,
            updated_at: now,
        };
        let todo = self.repo.insert(todo).await?;
        tracing::info!(owner = %session.username, id = %todo.id, "task created");
        Ok(todo)
    }

    async fn list_for_owner(&self, session: &Session) -> Result<Vec<Todo>, TodoError> {
        Ok(self.repo.list_by_owner(&session.username).await?)
    }

    async fn get_detail(&self, session: &Session, id: TodoId) -> Result<Todo, TodoError> {
        self.owned_item(session, id).await
    }

    /// Idempotent: completing an already-completed task is accepted and
    /// still refreshes `updated_at`.
    async fn mark_completed(&self, session: &Session, id: TodoId) -> Result<Todo, TodoError> {
        let mut todo = self.owned_item(session, id).await?;
        todo.status = TodoStatus::Completed;
        todo.updated_at = Utc::now();
        self.repo
            .replace(todo)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    async fn edit(&self, session: &Session, id: TodoId, input: UpdateTodo) -> Result<Todo, TodoError> {
        if let Some(title) = &input.title {
            if title.trim().is_empty() {
                return Err(TodoError::Validation("title cannot be empty".into()));
            }
        }
        let mut todo = self.owned_item(session, id).await?;
        if let Some(title) = input.title { todo.title = title; }
        if let Some(details) = input.details { todo.details = details; }
        if let Some(priority) = input.priority { todo.priority = priority; }
        todo.updated_at = Utc::now();
        self.repo
            .replace(todo)
            .await?
            .ok_or(TodoError::NotFound(id))
    }
}
