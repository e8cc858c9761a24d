//! # 一覧取得の絞り込み条件
//!
//! `GET /todos` のクエリパラメータから組み立てる述語。
//! すべての条件は AND で合成される。
//!
//! | 条件 | 意味 |
//! |------|------|
//! | `completed` | 完了フラグの一致 |
//! | `deadline_before` | 期限が指定時刻より厳密に前（期限なしは除外） |

use chrono::{DateTime, Duration, Utc};

use crate::{DomainError, todo::Todo};

/// `window` に指定できる日数の上限（chrono の日時範囲を超えないため）
const MAX_WINDOW_DAYS: i64 = 36_500;

/// 完了フラグの絞り込み指定をパースする
///
/// `"true"` / `"false"` のみを条件として扱い、それ以外の値は
/// 「絞り込みなし」とみなす。
pub fn parse_completed(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// 期間指定（日数）をパースする
///
/// - 未指定・空文字列 → `Ok(None)`（絞り込みなし）
/// - 非負整数 → `Ok(Some(days))`
/// - それ以外 → [`DomainError::InvalidWindow`]
pub fn parse_window(value: Option<&str>) -> Result<Option<i64>, DomainError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<i64>() {
        Ok(days) if (0..=MAX_WINDOW_DAYS).contains(&days) => Ok(Some(days)),
        _ => Err(DomainError::InvalidWindow(raw.to_string())),
    }
}

/// Todo 一覧の絞り込み条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// 完了フラグの一致条件
    pub completed:       Option<bool>,
    /// 期限の上限（この時刻より前の期限のみ対象）
    pub deadline_before: Option<DateTime<Utc>>,
}

impl TodoFilter {
    /// 絞り込みなし
    pub fn all() -> Self {
        Self::default()
    }

    /// 完了フラグの条件を設定する
    pub fn with_completed(self, completed: Option<bool>) -> Self {
        Self { completed, ..self }
    }

    /// `now` から `days` 日以内に期限を迎える Todo に絞り込む
    pub fn within_window(self, now: DateTime<Utc>, days: Option<i64>) -> Self {
        Self {
            deadline_before: days.map(|d| now + Duration::days(d)),
            ..self
        }
    }

    /// Todo が条件をすべて満たすか判定する
    ///
    /// インメモリ実装やテストで使用する。PostgreSQL 実装は同じ条件を SQL で表現する。
    pub fn matches(&self, todo: &Todo) -> bool {
        let completed_ok = self.completed.is_none_or(|c| todo.completed() == c);
        let deadline_ok = match self.deadline_before {
            None => true,
            Some(limit) => todo.deadline_at().is_some_and(|d| d < limit),
        };

        completed_ok && deadline_ok
    }
}
