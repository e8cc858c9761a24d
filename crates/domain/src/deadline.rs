//! # 期限日時のパース
//!
//! クライアントから受け取る `deadline_at` 文字列を UTC の日時に変換する。
//!
//! ## 受け付ける形式
//!
//! | 形式 | 例 | 解釈 |
//! |------|----|------|
//! | RFC 3339（オフセット付き） | `2023-02-27T09:00:00+09:00` | そのまま UTC に変換 |
//! | オフセットなし日時 | `2023-02-27T00:00:00`, `2023-02-27 00:00:00.5` | UTC とみなす |
//! | 日付のみ | `2023-02-27` | その日の 00:00:00 UTC |
//!
//! 日付と時刻の区切りは `T` と半角スペースの両方を許容する。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::DomainError;

/// オフセットなし日時として試すフォーマット
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ISO-8601 形式の文字列を UTC 日時にパースする
///
/// どの形式にも一致しない場合は [`DomainError::InvalidDeadline`] を返す。
pub fn parse_deadline(value: &str) -> Result<DateTime<Utc>, DomainError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DomainError::InvalidDeadline(value.to_string()))
}
