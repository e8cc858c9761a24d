//! # TodoRepository
//!
//! Todo の作成・取得・更新・削除を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **ID はデータベースが採番**: `BIGSERIAL` の値を `RETURNING` で受け取る
//! - **絞り込みは 1 本の SQL**: 未指定の条件は `$n IS NULL` で無効化する

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use todoflow_domain::{
    filter::TodoFilter,
    todo::{NewTodo, Todo, TodoId, TodoTitle},
};

use crate::error::InfraError;

/// Todo リポジトリトレイト
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todo を挿入し、採番された ID を含む Todo を返す
    async fn insert(&self, new_todo: &NewTodo) -> Result<Todo, InfraError>;

    /// ID で Todo を検索する
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError>;

    /// 条件に一致する Todo を ID 昇順で取得する
    async fn find_all(&self, filter: &TodoFilter) -> Result<Vec<Todo>, InfraError>;

    /// Todo を更新する
    ///
    /// 対象が存在しない場合は `Ok(None)` を返す。
    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, InfraError>;

    /// Todo を削除する
    ///
    /// 削除した Todo を返す。対象が存在しない場合は `Ok(None)`。
    async fn delete(&self, id: TodoId) -> Result<Option<Todo>, InfraError>;
}

/// `todos` テーブルの 1 行
#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id:          i64,
    title:       String,
    description: Option<String>,
    completed:   bool,
    deadline_at: Option<DateTime<Utc>>,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = InfraError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let title = TodoTitle::new(row.title).map_err(|e| {
            InfraError::unexpected(format!("不正なタイトル (id={}): {e}", row.id))
        })?;

        Ok(Todo::from_db(
            TodoId::new(row.id),
            title,
            row.description,
            row.completed,
            row.deadline_at,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// PostgreSQL 実装の TodoRepository
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_todo: &NewTodo) -> Result<Todo, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (title, description, completed, deadline_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, title, description, completed, deadline_at, created_at, updated_at
            "#,
        )
        .bind(new_todo.title.as_str())
        .bind(new_todo.description.as_deref())
        .bind(new_todo.completed)
        .bind(new_todo.deadline_at)
        .bind(new_todo.now)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, description, completed, deadline_at, created_at, updated_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(completed = ?filter.completed))]
    async fn find_all(&self, filter: &TodoFilter) -> Result<Vec<Todo>, InfraError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, description, completed, deadline_at, created_at, updated_at
            FROM todos
            WHERE ($1::boolean IS NULL OR completed = $1)
              AND ($2::timestamptz IS NULL OR deadline_at < $2)
            ORDER BY id
            "#,
        )
        .bind(filter.completed)
        .bind(filter.deadline_before)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %todo.id()))]
    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos
            SET title = $2, description = $3, completed = $4, deadline_at = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, title, description, completed, deadline_at, created_at, updated_at
            "#,
        )
        .bind(todo.id().as_i64())
        .bind(todo.title().as_str())
        .bind(todo.description())
        .bind(todo.completed())
        .bind(todo.deadline_at())
        .bind(todo.updated_at())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            DELETE FROM todos
            WHERE id = $1
            RETURNING id, title, description, completed, deadline_at, created_at, updated_at
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }
}
