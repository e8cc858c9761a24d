//! # Todo Service エラー定義
//!
//! Todo Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//! レスポンスボディは常に `{"error": "<メッセージ>"}` の形になる。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todoflow_domain::DomainError;
use todoflow_infra::{InfraError, error::InfraErrorKind};
use todoflow_shared::{
    ErrorResponse,
    event_log::error::{category, kind},
};

/// Todo Service で発生するエラー
#[derive(Debug, Error)]
pub enum TodoError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),
}

/// クライアント入力に起因するドメインエラーは 400 にする
impl From<DomainError> for TodoError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::BadRequest(msg),
            DomainError::InvalidDeadline(_) => Self::BadRequest("invalid deadline_at".to_string()),
            DomainError::InvalidWindow(_) => Self::BadRequest("invalid window".to_string()),
        }
    }
}

/// ログの `error.kind` を決める
fn error_kind(err: &InfraError) -> &'static str {
    match err.kind() {
        InfraErrorKind::Database(_) | InfraErrorKind::Migration(_) => kind::DATABASE,
        InfraErrorKind::Unexpected(_) => kind::INTERNAL,
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            TodoError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            TodoError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            TodoError::Database(e) => {
                tracing::error!(
                    error.category = category::INFRASTRUCTURE,
                    error.kind = error_kind(&e),
                    span_trace = %e.span_trace(),
                    "データベースエラー: {}",
                    e
                );
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal_error())
            }
        };

        (status, Json(body)).into_response()
    }
}
