//! テストユーティリティ
//!
//! 統合テストで使うアプリケーション構築ヘルパー。
//! `test-utils` feature で公開する。

mod todo_test_app;

pub use todo_test_app::{TestResponse, TodoTestApp};
