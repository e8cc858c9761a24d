//! # Todo ハンドラ
//!
//! Todo の CRUD API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /todos` - 一覧（`?completed=true|false`、`?window=<日数>`）
//! - `GET /todos/{id}` - 1 件取得
//! - `POST /todos` - 作成
//! - `PUT /todos/{id}` - 更新
//! - `DELETE /todos/{id}` - 削除
//!
//! リクエストボディは JSON オブジェクトのみ受け付ける。
//! JSON として不正、オブジェクトでない、型が一致しない場合は 400 `invalid json`。
//!
//! パスとクエリも axum の拒否レスポンスをそのまま返さず、
//! 常に `{"error": ...}` の形で返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path,
        Query,
        State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use todoflow_domain::todo::{Todo, TodoId};
use todoflow_shared::Patch;

use crate::{
    error::TodoError,
    usecase::{
        CreateTodoInput,
        ListTodosInput,
        TodoUseCaseImpl,
        UpdateTodoInput,
        todo::TODO_NOT_FOUND,
    },
};

/// ボディが解釈できない場合のメッセージ
pub const INVALID_JSON: &str = "invalid json";
/// パスの ID が整数でない場合のメッセージ
pub const INVALID_ID: &str = "invalid id";
/// クエリ文字列が解釈できない場合のメッセージ
pub const INVALID_QUERY: &str = "invalid query";

/// Todo API の共有状態
pub struct TodoState {
    pub usecase: TodoUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// Todo 作成リクエスト
///
/// 許可されたキー以外を含む場合は拒否する。`id` は受け付けるが無視する。
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoRequest {
    pub title:       Option<String>,
    pub description: Option<String>,
    pub completed:   Option<bool>,
    pub deadline_at: Option<String>,
    pub id:          Option<serde::de::IgnoredAny>,
}

/// Todo 更新リクエスト
///
/// 未知のキーは無視する。`null` と「キーなし」を [`Patch`] で区別する。
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title:       Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub completed:   Patch<bool>,
    #[serde(default)]
    pub deadline_at: Patch<String>,
}

/// Todo DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TodoDto {
    pub id:          i64,
    pub title:       String,
    pub description: Option<String>,
    pub completed:   bool,
    pub deadline_at: Option<DateTime<Utc>>,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            id:          todo.id().as_i64(),
            title:       todo.title().as_str().to_string(),
            description: todo.description().map(str::to_string),
            completed:   todo.completed(),
            deadline_at: todo.deadline_at(),
            created_at:  todo.created_at(),
            updated_at:  todo.updated_at(),
        }
    }
}

/// JSON オブジェクトのボディを型付きリクエストに変換する
///
/// 配列など、オブジェクト以外の JSON もここで拒否する。
fn parse_body<T: DeserializeOwned>(
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<T, TodoError> {
    let Json(object) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "リクエストボディを解釈できません");
        TodoError::BadRequest(INVALID_JSON.to_string())
    })?;

    serde_json::from_value(Value::Object(object)).map_err(|e| {
        tracing::debug!(error = %e, "リクエストボディの形式が不正です");
        TodoError::BadRequest(INVALID_JSON.to_string())
    })
}

/// パスの ID を解釈する
///
/// - 整数 → `Some(id)`
/// - `i64` に収まらない数字列 → `None`（該当する Todo は存在し得ない）
/// - それ以外 → 400 `invalid id`
fn parse_todo_id(
    path: Result<Path<String>, PathRejection>,
) -> Result<Option<TodoId>, TodoError> {
    let Path(raw) = path.map_err(|rejection| {
        tracing::debug!(%rejection, "パスパラメータを解釈できません");
        TodoError::BadRequest(INVALID_ID.to_string())
    })?;

    match raw.parse::<i64>() {
        Ok(id) => Ok(Some(TodoId::new(id))),
        Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => Ok(None),
        Err(_) => Err(TodoError::BadRequest(INVALID_ID.to_string())),
    }
}

fn not_found() -> TodoError {
    TodoError::NotFound(TODO_NOT_FOUND.to_string())
}

/// クエリパラメータのうち、指定したキーの最初の値を返す
///
/// 同じキーが複数ある場合も拒否せず、先頭の値を使う。
fn first_param(params: &[(String, String)], key: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

// --- ハンドラ ---

/// GET /todos
///
/// 条件に一致する Todo を ID 昇順で返す。
///
/// ## レスポンス
///
/// - `200 OK`: Todo の配列
/// - `400 Bad Request`: `window` が不正
#[tracing::instrument(skip_all)]
pub async fn list_todos(
    State(state): State<Arc<TodoState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, TodoError> {
    let Query(params) = query.map_err(|rejection| {
        tracing::debug!(%rejection, "クエリ文字列を解釈できません");
        TodoError::BadRequest(INVALID_QUERY.to_string())
    })?;

    let todos = state
        .usecase
        .list_todos(ListTodosInput {
            completed: first_param(&params, "completed"),
            window:    first_param(&params, "window"),
        })
        .await?;

    let items: Vec<TodoDto> = todos.iter().map(TodoDto::from).collect();
    Ok((StatusCode::OK, Json(items)))
}

/// GET /todos/{id}
///
/// ## レスポンス
///
/// - `200 OK`: Todo
/// - `400 Bad Request`: `invalid id`
/// - `404 Not Found`: `Todo not found`
#[tracing::instrument(skip_all)]
pub async fn get_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, TodoError> {
    let id = parse_todo_id(path)?.ok_or_else(not_found)?;
    let todo = state.usecase.get_todo(id).await?;

    Ok((StatusCode::OK, Json(TodoDto::from(&todo))))
}

/// POST /todos
///
/// ## レスポンス
///
/// - `201 Created`: 作成された Todo
/// - `400 Bad Request`: `invalid json` / `No title given` / `invalid deadline_at`
#[tracing::instrument(skip_all)]
pub async fn create_todo(
    State(state): State<Arc<TodoState>>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<impl IntoResponse, TodoError> {
    let req: CreateTodoRequest = parse_body(body)?;

    let todo = state
        .usecase
        .create_todo(CreateTodoInput {
            title:       req.title,
            description: req.description,
            completed:   req.completed,
            deadline_at: req.deadline_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TodoDto::from(&todo))))
}

/// PUT /todos/{id}
///
/// `title` は必須。`completed` の `null` は指定なしとして扱う。
/// 対象の存在確認はボディの解釈より先に行う。
///
/// ## レスポンス
///
/// - `200 OK`: 更新後の Todo
/// - `400 Bad Request`: `invalid id` / `invalid json` / `Todo requires title` / `invalid deadline_at`
/// - `404 Not Found`: `Todo not found`
#[tracing::instrument(skip_all)]
pub async fn update_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<impl IntoResponse, TodoError> {
    let id = parse_todo_id(path)?.ok_or_else(not_found)?;
    let current = state.usecase.get_todo(id).await?;

    let req: UpdateTodoRequest = parse_body(body)?;

    let todo = state
        .usecase
        .update_todo(current, UpdateTodoInput {
            title:       req.title.value(),
            description: req.description,
            completed:   req.completed.value(),
            deadline_at: req.deadline_at,
        })
        .await?;

    Ok((StatusCode::OK, Json(TodoDto::from(&todo))))
}

/// DELETE /todos/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 削除した Todo。存在しなかった場合は `{}`
/// - `400 Bad Request`: `invalid id`
#[tracing::instrument(skip_all)]
pub async fn delete_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, TodoError> {
    let deleted = match parse_todo_id(path)? {
        Some(id) => state.usecase.delete_todo(id).await?,
        None => None,
    };

    let response = match deleted {
        Some(todo) => Json(TodoDto::from(&todo)).into_response(),
        None => Json(Map::new()).into_response(),
    };
    Ok(response)
}
