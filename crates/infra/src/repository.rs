//! # リポジトリ実装
//!
//! Todo の永続化を担当するリポジトリトレイトと PostgreSQL 実装を提供する。
//! ユースケース層はトレイト経由で利用するため、テストではインメモリ実装に差し替えられる。

pub mod todo_repository;

pub use todo_repository::{PostgresTodoRepository, TodoRepository};
