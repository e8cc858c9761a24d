//! # 部分更新フィールド
//!
//! JSON リクエストボディの「キーが存在しない」と「値が `null`」を区別するための型。
//! `Option<T>` だけではこの 2 つを区別できない。
//!
//! ## 使用方法
//!
//! フィールドに `#[serde(default)]` を付与する。キーが存在しない場合は
//! `Default` により [`Patch::Absent`] になり、キーが存在する場合は
//! 値に応じて [`Patch::Null`] または [`Patch::Value`] になる。
//!
//! ```
//! use serde::Deserialize;
//! use todoflow_shared::Patch;
//!
//! #[derive(Deserialize)]
//! struct Body {
//!     #[serde(default)]
//!     description: Patch<String>,
//! }
//!
//! let absent: Body = serde_json::from_str("{}").unwrap();
//! assert_eq!(absent.description, Patch::Absent);
//!
//! let null: Body = serde_json::from_str(r#"{"description": null}"#).unwrap();
//! assert_eq!(null.description, Patch::Null);
//! ```

use serde::{Deserialize, Deserializer};

/// 部分更新リクエストの 1 フィールド
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// キーが存在しない（現在の値を維持する）
    #[default]
    Absent,
    /// キーが存在し、値が `null`
    Null,
    /// キーが存在し、値がある
    Value(T),
}

impl<T> Patch<T> {
    /// 値があれば `Some` を返す（`Absent` / `Null` は `None`）
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    /// 値に関数を適用する
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Null => Patch::Null,
            Self::Value(v) => Patch::Value(f(v)),
        }
    }

    /// 現在の値に適用した結果を返す
    ///
    /// - `Absent` → `current` をそのまま返す
    /// - `Null` → `None`
    /// - `Value(v)` → `Some(v)`
    pub fn apply_to(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Absent => current,
            Self::Null => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl<T, E> Patch<Result<T, E>> {
    /// `Patch<Result<T, E>>` を `Result<Patch<T>, E>` に入れ替える
    pub fn transpose(self) -> Result<Patch<T>, E> {
        match self {
            Self::Absent => Ok(Patch::Absent),
            Self::Null => Ok(Patch::Null),
            Self::Value(v) => v.map(Patch::Value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // キーが存在する場合のみ呼ばれる。不在は #[serde(default)] で Absent になる。
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}
