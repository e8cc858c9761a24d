//! # Todo（タスク項目）
//!
//! システムが扱う唯一のエンティティ。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Todo`] | Todo | 1 件のタスク。タイトル・説明・完了フラグ・期限を持つ |
//! | [`TodoId`] | Todo ID | リポジトリが採番する整数 ID。作成後は不変 |
//! | [`TodoTitle`] | タイトル | 空文字列を許さない値オブジェクト |
//! | [`NewTodo`] | 新規 Todo | ID 採番前の挿入用データ |
//!
//! ## 不変条件
//!
//! - `title` は常に空でない
//! - `created_at <= updated_at`
//! - `id` と `created_at` は作成後に変化しない
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::Utc;
//! use todoflow_domain::todo::{NewTodo, Todo, TodoId, TodoTitle};
//!
//! let now = Utc::now();
//! let new_todo = NewTodo::new(TodoTitle::new("レポートを書く").unwrap(), None, false, None, now);
//!
//! // リポジトリが ID を採番した後の状態
//! let todo = Todo::from_new(TodoId::new(1), new_todo);
//! assert_eq!(todo.created_at(), todo.updated_at());
//! assert!(!todo.completed());
//! ```

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Todo ID（リポジトリが採番する整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct TodoId(i64);

impl TodoId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Todo のタイトル（値オブジェクト）
///
/// # 不変条件
///
/// - 空文字列・空白のみの文字列ではない
///
/// 前後の空白は保持する（クライアントが送った値をそのまま保存する）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct TodoTitle(String);

impl TodoTitle {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(DomainError::Validation(
                "タイトルを入力してください".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 挿入前の Todo
///
/// ID はリポジトリが採番するため持たない。
/// `created_at` と `updated_at` はどちらも `now` になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title:       TodoTitle,
    pub description: Option<String>,
    pub completed:   bool,
    pub deadline_at: Option<DateTime<Utc>>,
    pub now:         DateTime<Utc>,
}

impl NewTodo {
    pub fn new(
        title: TodoTitle,
        description: Option<String>,
        completed: bool,
        deadline_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title,
            description,
            completed,
            deadline_at,
            now,
        }
    }
}

/// Todo エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id:          TodoId,
    title:       TodoTitle,
    description: Option<String>,
    completed:   bool,
    deadline_at: Option<DateTime<Utc>>,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl Todo {
    /// 採番済み ID と挿入データから Todo を組み立てる
    pub fn from_new(id: TodoId, new_todo: NewTodo) -> Self {
        Self {
            id,
            title: new_todo.title,
            description: new_todo.description,
            completed: new_todo.completed,
            deadline_at: new_todo.deadline_at,
            created_at: new_todo.now,
            updated_at: new_todo.now,
        }
    }

    /// データベースから Todo を復元する
    pub fn from_db(
        id: TodoId,
        title: TodoTitle,
        description: Option<String>,
        completed: bool,
        deadline_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            completed,
            deadline_at,
            created_at,
            updated_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &TodoTitle {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn deadline_at(&self) -> Option<DateTime<Utc>> {
        self.deadline_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // 不変更新メソッド

    /// タイトルを更新する
    pub fn with_title(self, title: TodoTitle, now: DateTime<Utc>) -> Self {
        Self {
            title,
            updated_at: self.touched_at(now),
            ..self
        }
    }

    /// 説明を更新する（`None` で削除）
    pub fn with_description(self, description: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            description,
            updated_at: self.touched_at(now),
            ..self
        }
    }

    /// 完了フラグを更新する
    pub fn with_completed(self, completed: bool, now: DateTime<Utc>) -> Self {
        Self {
            completed,
            updated_at: self.touched_at(now),
            ..self
        }
    }

    /// 期限を更新する（`None` で削除）
    pub fn with_deadline_at(self, deadline_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        Self {
            deadline_at,
            updated_at: self.touched_at(now),
            ..self
        }
    }

    /// `updated_at` が過去に戻らないよう、現在の値以上に丸める
    fn touched_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.updated_at)
    }
}
