//! # TodoFlow ドメイン層
//!
//! Todo 管理のビジネスルールを担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: [`todo::Todo`]（一意の整数 ID を持つ唯一のエンティティ）
//! - **値オブジェクト**: [`todo::TodoTitle`]、[`filter::TodoFilter`]
//! - **ドメインエラー**: ビジネスルール違反を表現する [`DomainError`]
//!
//! ## 依存関係の方向
//!
//! ```text
//! service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 現在時刻の抽象化
//! - [`deadline`] - ISO-8601 形式の期限文字列のパース
//! - [`error`] - ドメイン層エラー
//! - [`filter`] - 一覧取得時の絞り込み条件
//! - [`todo`] - Todo エンティティ
//!
//! ## 使用例
//!
//! ```rust
//! use todoflow_domain::{DomainError, todo::TodoTitle};
//!
//! let title = TodoTitle::new("牛乳を買う").unwrap();
//! assert_eq!(title.as_str(), "牛乳を買う");
//!
//! let error = TodoTitle::new("").unwrap_err();
//! assert!(matches!(error, DomainError::Validation(_)));
//! ```

pub mod clock;
pub mod deadline;
pub mod error;
pub mod filter;
pub mod todo;

pub use error::DomainError;
