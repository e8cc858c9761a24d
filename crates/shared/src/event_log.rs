//! # ビジネスイベントログ
//!
//! Todo の作成・更新・削除を構造化ログとして出力するためのヘルパー。
//!
//! [`log_business_event!`] マクロは `event.kind = "business_event"` マーカーを自動付与する。
//! `jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! フィールド名はドット記法（`event.action`、`event.entity_id`）を使用し、
//! JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `tracing::info!` レベルで出力する。
///
/// ## 慣例フィールド
///
/// - `event.category`: [`event::category`] の定数
/// - `event.action`: [`event::action`] の定数
/// - `event.entity_type`: [`event::entity_type`] の定数
/// - `event.entity_id`: エンティティ ID
/// - `event.result`: [`event::result`] の定数
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const TODO: &str = "todo";
    }

    /// イベントアクション
    pub mod action {
        pub const TODO_CREATED: &str = "todo.created";
        pub const TODO_UPDATED: &str = "todo.updated";
        pub const TODO_DELETED: &str = "todo.deleted";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const TODO: &str = "todo";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（DB）
        pub const INFRASTRUCTURE: &str = "infrastructure";
    }

    /// エラー種別
    pub mod kind {
        pub const DATABASE: &str = "database";
        pub const INTERNAL: &str = "internal";
    }
}
