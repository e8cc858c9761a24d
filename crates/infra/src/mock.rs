//! # テスト用モックリポジトリ
//!
//! ユースケーステストや API テストで使用するインメモリリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todoflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todoflow_domain::{
    filter::TodoFilter,
    todo::{NewTodo, Todo, TodoId},
};

use crate::{error::InfraError, repository::TodoRepository};

#[derive(Debug, Default)]
struct Store {
    todos:   Vec<Todo>,
    last_id: i64,
}

/// インメモリの TodoRepository
///
/// PostgreSQL 実装と同じく ID を 1 から連番で採番し、ID 昇順で返す。
#[derive(Debug, Clone, Default)]
pub struct MockTodoRepository {
    store: Arc<Mutex<Store>>,
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みの Todo をすべて返す
    pub fn todos(&self) -> Vec<Todo> {
        self.store.lock().unwrap().todos.clone()
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn insert(&self, new_todo: &NewTodo) -> Result<Todo, InfraError> {
        let mut store = self.store.lock().unwrap();
        store.last_id += 1;
        let todo = Todo::from_new(TodoId::new(store.last_id), new_todo.clone());
        store.todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .todos
            .iter()
            .find(|t| t.id() == id)
            .cloned())
    }

    async fn find_all(&self, filter: &TodoFilter) -> Result<Vec<Todo>, InfraError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .todos
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn update(&self, todo: &Todo) -> Result<Option<Todo>, InfraError> {
        let mut store = self.store.lock().unwrap();
        let Some(slot) = store.todos.iter_mut().find(|t| t.id() == todo.id()) else {
            return Ok(None);
        };
        *slot = todo.clone();
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        let mut store = self.store.lock().unwrap();
        let Some(index) = store.todos.iter().position(|t| t.id() == id) else {
            return Ok(None);
        };
        Ok(Some(store.todos.remove(index)))
    }
}
