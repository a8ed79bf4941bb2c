//! Todo サービス
//!
//! 認可はここで必ず行う（クライアント側のガードには依存しない）。

use crate::context::RequestContext;
use chrono::Utc;
use domain::{NewTodo, Todo, TodoContent};
use shared::AppError;
use tracing::info;

/// ログイン中のユーザーの Todo を 1 件作成
///
/// `status` / `userId` / `createdAt` はサーバー側で確定する。
pub async fn create(ctx: &RequestContext, content: TodoContent) -> Result<Todo, AppError> {
    let session = ctx.require_session()?;

    let new_todo = NewTodo::stamped(content, session.user_id(), Utc::now());
    let todo = ctx.todos.create(new_todo).await?;

    info!(todo_id = %todo.id, user_id = %todo.user_id, "todo created");
    Ok(todo)
}

/// 全ユーザーの Todo を作成日時の昇順（同時刻は ID 順）で返す
pub async fn get_all(ctx: &RequestContext) -> Result<Vec<Todo>, AppError> {
    let mut todos = ctx.todos.find_all().await?;
    todos.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(todos)
}
