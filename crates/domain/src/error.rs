//! # ドメイン層エラー定義
//!
//! ビジネスルール違反や入力値の不正を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `InvalidDeadline` | 400 Bad Request | `deadline_at` が ISO-8601 として解釈できない |
//! | `InvalidWindow` | 400 Bad Request | `window` クエリが非負整数でない |
//!
//! HTTP ステータスへの変換はサービス層の責務。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 必須フィールドの欠落や空文字列など、入力値がビジネスルールに違反している場合。
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 期限日時のパースエラー
    #[error("期限日時の形式が不正です: {0}")]
    InvalidDeadline(String),

    /// 期間指定（日数）のパースエラー
    #[error("期間指定の形式が不正です: {0}")]
    InvalidWindow(String),
}
