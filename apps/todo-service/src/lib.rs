//! # Todo Service ライブラリ
//!
//! ルーター構築、ハンドラ、ユースケースを公開する。
//! 統合テストからはここを経由してアプリケーション全体を組み立てる。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;

// テストユーティリティ（内部実装、ドキュメントからは隠す）
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;
