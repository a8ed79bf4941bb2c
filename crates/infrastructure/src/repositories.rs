use crate::dynamodb::DynamoDbClient;
use crate::memory::InMemoryTodoRepository;
use crate::models::{item_to_todo, todo_to_item, TODO_SK_PREFIX};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use domain::{NewTodo, Todo, TodoId};
use shared::{AppError, Config, StoreBackend};
use std::sync::Arc;
use tracing::{info, warn};

/// Todo の永続化ストア
///
/// 作成は 1 件の原子的な挿入。ID はストアが払い出す。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError>;

    /// 全件取得（順序はストア依存）
    async fn find_all(&self) -> Result<Vec<Todo>, AppError>;
}

/// 設定に応じたストアを構築
pub async fn build_repository(config: &Config) -> Arc<dyn TodoRepository> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("using in-memory todo store");
            Arc::new(InMemoryTodoRepository::default())
        }
        StoreBackend::DynamoDb => {
            info!(table = %config.dynamodb_table, "using DynamoDB todo store");
            Arc::new(DynamoTodoRepository::new(DynamoDbClient::new(config).await))
        }
    }
}

pub struct DynamoTodoRepository {
    db: DynamoDbClient,
}

impl DynamoTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for DynamoTodoRepository {
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError> {
        let todo = new_todo.into_todo(TodoId::new());

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(&todo)))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| AppError::Storage(DisplayErrorContext(&e).to_string()))?;

        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, AppError> {
        let mut todos = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .db
                .client()
                .scan()
                .table_name(self.db.table_name())
                .filter_expression("begins_with(SK, :sk_prefix)")
                .expression_attribute_values(
                    ":sk_prefix",
                    AttributeValue::S(TODO_SK_PREFIX.to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| AppError::Storage(DisplayErrorContext(&e).to_string()))?;

            for item in output.items() {
                match item_to_todo(item) {
                    Some(todo) => todos.push(todo),
                    None => warn!(?item, "skipping undecodable todo item"),
                }
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(todos)
    }
}
