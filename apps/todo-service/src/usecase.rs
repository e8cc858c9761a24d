//! # ユースケース層
//!
//! Todo Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリと時刻を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、検証と更新規則はユースケースに集約

pub mod todo;

pub use todo::{CreateTodoInput, ListTodosInput, TodoUseCaseImpl, UpdateTodoInput};
