//! # TodoFlow 共有ユーティリティ
//!
//! サービス・インフラ・ドメインの各クレートから使用される共通ユーティリティ。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（HTTP レスポンス変換は各サービスの責務）
//! - トレーシング関連は `observability` feature で有効化する

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
#[cfg(feature = "observability")]
pub mod event_log;
pub mod health;
pub mod observability;
pub mod patch;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
pub use patch::Patch;
