#[cfg(test)]
mod tests {
    use super::super::todo_service::{TodoService, TodoServiceImpl};
    use crate::domain::{
        error::{StorageError, TodoError},
        repository::TodoRepository,
        todo::{CreateTodo, Priority, Todo, TodoId, TodoStatus, UpdateTodo},
        user::Session,
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    // Vec rather than a map so list_by_owner keeps insertion order.
    #[derive(Clone, Default)]
    struct InMemoryTodos {
        items: Arc<Mutex<Vec<Todo>>>,
    }

    #[async_trait]
    impl TodoRepository for InMemoryTodos {
        async fn init(&self) -> Result<(), StorageError> { Ok(()) }
        async fn insert(&self, todo: Todo) -> Result<Todo, StorageError> {
            self.items.lock().unwrap().push(todo.clone());
            Ok(todo)
        }
        async fn get(&self, id: TodoId) -> Result<Option<Todo>, StorageError> {
            Ok(self.items.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }
        async fn list_by_owner(&self, owner: &str) -> Result<Vec<Todo>, StorageError> {
            Ok(self.items.lock().unwrap().iter().filter(|t| t.owner == owner).cloned().collect())
        }
        async fn replace(&self, todo: Todo) -> Result<Option<Todo>, StorageError> {
            let mut items = self.items.lock().unwrap();
            let Some(slot) = items.iter_mut().find(|t| t.id == todo.id) else { return Ok(None) };
            *slot = todo.clone();
            Ok(Some(todo))
        }
    }

    fn service() -> TodoServiceImpl<InMemoryTodos> {
        TodoServiceImpl::new(InMemoryTodos::default())
    }

    fn session(name: &str) -> Session {
        Session { username: name.to_string() }
    }

    fn input(title: &str, priority: Priority) -> CreateTodo {
        CreateTodo { title: title.into(), details: "details".into(), priority }
    }

    #[tokio::test]
    async fn create_then_detail_is_pending_with_equal_timestamps() {
        let svc = service();
        let alice = session("alice");
        let created = svc.create(&alice, input("Buy milk", Priority::Low)).await.unwrap();
        let got = svc.get_detail(&alice, created.id).await.unwrap();
        assert_eq!(got.status, TodoStatus::Pending);
        assert_eq!(got.created_at, got.updated_at);
        assert_eq!(got.owner, "alice");
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let svc = service();
        let err = svc.create(&session("alice"), input("   ", Priority::High)).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
    }

    #[tokio::test]
    async fn list_is_filtered_by_owner_in_creation_order() {
        let svc = service();
        let alice = session("alice");
        let bob = session("bob");
        svc.create(&alice, input("first", Priority::High)).await.unwrap();
        svc.create(&bob, input("intruder", Priority::Mid)).await.unwrap();
        svc.create(&alice, input("second", Priority::Low)).await.unwrap();

        let titles: Vec<_> = svc.list_for_owner(&alice).await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert!(svc.list_for_owner(&bob).await.unwrap().iter().all(|t| t.owner == "bob"));
    }

    #[tokio::test]
    async fn detail_of_another_users_item_is_forbidden() {
        let svc = service();
        let item = svc.create(&session("alice"), input("private", Priority::Mid)).await.unwrap();
        let err = svc.get_detail(&session("bob"), item.id).await.unwrap_err();
        assert!(matches!(err, TodoError::Forbidden(id) if id == item.id));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let svc = service();
        let err = svc.get_detail(&session("alice"), TodoId::default()).await.unwrap_err();
        assert!(matches!(err, TodoError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_completed_sets_status_and_refreshes_updated_at() {
        let svc = service();
        let alice = session("alice");
        let created = svc.create(&alice, input("task", Priority::High)).await.unwrap();
        let before = created.updated_at;

        let done = svc.mark_completed(&alice, created.id).await.unwrap();
        assert_eq!(done.status, TodoStatus::Completed);
        assert!(done.updated_at >= before);

        // Completing again is a no-op on status but still touches updated_at.
        let again = svc.mark_completed(&alice, created.id).await.unwrap();
        assert_eq!(again.status, TodoStatus::Completed);
        assert!(again.updated_at >= done.updated_at);
    }

    #[tokio::test]
    async fn mark_completed_checks_ownership() {
        let svc = service();
        let item = svc.create(&session("alice"), input("task", Priority::Low)).await.unwrap();
        let err = svc.mark_completed(&session("bob"), item.id).await.unwrap_err();
        assert!(matches!(err, TodoError::Forbidden(_)));
    }

    #[tokio::test]
    async fn edit_updates_only_supplied_fields() {
        let svc = service();
        let alice = session("alice");
        let created = svc.create(&alice, input("old title", Priority::Low)).await.unwrap();

        let edited = svc
            .edit(&alice, created.id, UpdateTodo { title: Some("new title".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(edited.title, "new title");
        assert_eq!(edited.details, "details");
        assert_eq!(edited.priority, Priority::Low);
        assert_eq!(edited.status, TodoStatus::Pending);
        assert!(edited.updated_at >= created.updated_at);

        let reprioritized = svc
            .edit(&alice, created.id, UpdateTodo { priority: Some(Priority::High), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(reprioritized.title, "new title");
        assert_eq!(reprioritized.priority, Priority::High);
    }

    #[tokio::test]
    async fn edit_leaves_completed_status_untouched() {
        let svc = service();
        let alice = session("alice");
        let created = svc.create(&alice, input("task", Priority::Mid)).await.unwrap();
        svc.mark_completed(&alice, created.id).await.unwrap();

        let edited = svc
            .edit(&alice, created.id, UpdateTodo { details: Some("revised".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(edited.status, TodoStatus::Completed);
        assert_eq!(edited.details, "revised");
    }

    #[tokio::test]
    async fn edit_rejects_an_empty_replacement_title() {
        let svc = service();
        let alice = session("alice");
        let created = svc.create(&alice, input("task", Priority::Mid)).await.unwrap();
        let err = svc
            .edit(&alice, created.id, UpdateTodo { title: Some("".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
    }
}
