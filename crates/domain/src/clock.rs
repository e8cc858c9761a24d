//! # Clock（時刻プロバイダ）
//!
//! ユースケース層での `Utc::now()` 直接呼び出しを置き換え、
//! テストで時刻を注入可能にするための抽象化。
//!
//! `created_at` / `updated_at` の設定と、一覧取得の `window` 絞り込みの
//! 基準時刻はすべてこのトレイト経由で取得する。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// 呼び出しのたびに一定間隔だけ進む時刻を返すテスト用実装
///
/// 更新のたびに `updated_at` が前進することを検証するテストで使用する。
#[cfg(any(test, feature = "test-support"))]
pub struct SteppingClock {
    next: std::sync::Mutex<DateTime<Utc>>,
    step: chrono::Duration,
}

#[cfg(any(test, feature = "test-support"))]
impl SteppingClock {
    /// `start` から開始し、`now()` の呼び出しごとに `step` だけ進む
    pub fn new(start: DateTime<Utc>, step: chrono::Duration) -> Self {
        Self {
            next: std::sync::Mutex::new(start),
            step,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        let current = *next;
        *next = current + self.step;
        current
    }
}
