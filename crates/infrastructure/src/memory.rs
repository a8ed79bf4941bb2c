use crate::repositories::TodoRepository;
use async_trait::async_trait;
use domain::{NewTodo, Todo, TodoId};
use shared::AppError;
use std::sync::Mutex;

/// 簡易な InMemory 実装（開発/テスト用）。挿入順を保持する。
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    /// 既存レコードを持った状態で生成
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: Mutex::new(todos),
        }
    }

    pub fn len(&self) -> usize {
        self.todos.lock().map(|todos| todos.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError> {
        let todo = new_todo.into_todo(TodoId::new());
        let mut todos = self
            .todos
            .lock()
            .map_err(|_| AppError::Storage("in-memory store poisoned".to_string()))?;
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, AppError> {
        let todos = self
            .todos
            .lock()
            .map_err(|_| AppError::Storage("in-memory store poisoned".to_string()))?;
        Ok(todos.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{TodoContent, TodoStatus, UserId};

    fn new_todo(content: &str, owner: &str) -> NewTodo {
        NewTodo::stamped(
            TodoContent::parse(content).unwrap(),
            &UserId::parse(owner).unwrap(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let repo = InMemoryTodoRepository::default();
        assert!(repo.find_all().await.unwrap().is_empty());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn create_assigns_id_and_keeps_fields() {
        let repo = InMemoryTodoRepository::default();
        let todo = repo.create(new_todo("buy milk", "u1")).await.unwrap();

        assert_eq!(todo.id.as_str().len(), 26);
        assert_eq!(todo.content, "buy milk");
        assert_eq!(todo.status, TodoStatus::Incomplete);
        assert_eq!(todo.user_id.as_str(), "u1");
        assert_eq!(repo.find_all().await.unwrap(), vec![todo]);
    }

    #[tokio::test]
    async fn find_all_returns_every_owner_in_insertion_order() {
        let repo = InMemoryTodoRepository::default();
        let a = repo.create(new_todo("A", "u1")).await.unwrap();
        let b = repo.create(new_todo("B", "u2")).await.unwrap();

        assert_eq!(repo.find_all().await.unwrap(), vec![a, b]);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn with_todos_seeds_existing_records() {
        let seeded = new_todo("seed", "u9").into_todo(TodoId::new());
        let repo = InMemoryTodoRepository::with_todos(vec![seeded.clone()]);
        let created = repo.create(new_todo("next", "u1")).await.unwrap();

        assert_eq!(repo.find_all().await.unwrap(), vec![seeded, created]);
    }
}
