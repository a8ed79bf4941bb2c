//! 名前付きプロシージャの型付きディスパッチ表
//!
//! ワイヤ上は `todo.create` のような文字列キーで呼ばれるが、
//! 内部では `Procedure` → `Call`（型付き入力）→ ハンドラの順に解決する。

use crate::context::RequestContext;
use crate::service;
use crate::transformer::DatePaths;
use domain::{Session, Todo, TodoContent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::AppError;

/// プロシージャ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    /// 読み取り専用
    Query,
    /// 状態を変更する
    Mutation,
}

/// 公開しているプロシージャ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    GetSession,
    CreateTodo,
    GetAllTodos,
}

impl Procedure {
    pub const ALL: [Procedure; 3] = [
        Procedure::GetSession,
        Procedure::CreateTodo,
        Procedure::GetAllTodos,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Procedure::GetSession => "auth.getSession",
            Procedure::CreateTodo => "todo.create",
            Procedure::GetAllTodos => "todo.getAll",
        }
    }

    pub fn kind(self) -> ProcedureKind {
        match self {
            Procedure::GetSession | Procedure::GetAllTodos => ProcedureKind::Query,
            Procedure::CreateTodo => ProcedureKind::Mutation,
        }
    }

    pub fn from_path(path: &str) -> Result<Self, AppError> {
        Self::ALL
            .into_iter()
            .find(|procedure| procedure.path() == path)
            .ok_or_else(|| AppError::NotFound(format!("no procedure on path \"{path}\"")))
    }
}

/// `todo.create` の入力。サーバー側で決めるフィールドは受け付けない。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoInput {
    pub content: String,
}

/// 入力検証済みの呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetSession,
    CreateTodo { content: TodoContent },
    GetAllTodos,
}

impl Call {
    /// 入力の形を検証して型付きの呼び出しに変換（ハンドラ本体より前に失敗する）
    pub fn parse(procedure: Procedure, input: Option<Value>) -> Result<Self, AppError> {
        match procedure {
            Procedure::GetSession => expect_no_input(procedure, input).map(|_| Call::GetSession),
            Procedure::GetAllTodos => {
                expect_no_input(procedure, input).map(|_| Call::GetAllTodos)
            }
            Procedure::CreateTodo => {
                let raw = input.ok_or_else(|| {
                    AppError::Validation(format!("{} requires input", procedure.path()))
                })?;
                let input: CreateTodoInput = serde_json::from_value(raw)
                    .map_err(|e| AppError::Validation(format!("invalid input: {e}")))?;
                let content = TodoContent::parse(input.content)?;
                Ok(Call::CreateTodo { content })
            }
        }
    }

    pub fn procedure(&self) -> Procedure {
        match self {
            Call::GetSession => Procedure::GetSession,
            Call::CreateTodo { .. } => Procedure::CreateTodo,
            Call::GetAllTodos => Procedure::GetAllTodos,
        }
    }
}

fn expect_no_input(procedure: Procedure, input: Option<Value>) -> Result<(), AppError> {
    match input {
        None => Ok(()),
        Some(_) => Err(AppError::Validation(format!(
            "{} takes no input",
            procedure.path()
        ))),
    }
}

/// ハンドラの戻り値
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Session(Option<Session>),
    Todo(Todo),
    Todos(Vec<Todo>),
}

impl DatePaths for Output {
    fn collect_date_paths(&self, prefix: &str, out: &mut Vec<String>) {
        match self {
            Output::Session(session) => session.collect_date_paths(prefix, out),
            Output::Todo(todo) => todo.collect_date_paths(prefix, out),
            Output::Todos(todos) => todos.collect_date_paths(prefix, out),
        }
    }
}

/// 型付きの呼び出しをハンドラへ振り分ける
pub async fn dispatch(ctx: &RequestContext, call: Call) -> Result<Output, AppError> {
    match call {
        Call::GetSession => Ok(Output::Session(ctx.session.clone())),
        Call::CreateTodo { content } => service::create(ctx, content).await.map(Output::Todo),
        Call::GetAllTodos => service::get_all(ctx).await.map(Output::Todos),
    }
}
