//! # Canonical Log Line
//!
//! リクエスト完了時に、ステータスとレイテンシを 1 行にまとめたサマリログを出力する。
//!
//! `TraceLayer::on_response` に渡して使う。メソッド・URI・`request_id` は
//! [`make_request_span`](crate::observability::make_request_span) のスパンに載っているため、
//! このログ自体には持たせない。
//!
//! ```text
//! TraceLayer::new_for_http()
//!     .make_span_with(make_request_span)
//!     .on_response(CanonicalLogLine)
//! ```
//!
//! ヘルスチェックは TraceLayer の外側にルーティングし、出力対象にしない。

use std::time::Duration;

use http::{Response, StatusCode};
use tower_http::trace::OnResponse;

/// ステータスコードの分類（`2xx` など）
pub fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// `log.type = "canonical"` のサマリログを INFO で出力する [`OnResponse`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalLogLine;

impl<B> OnResponse<B> for CanonicalLogLine {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &tracing::Span) {
        let status = response.status();
        tracing::info!(
            log.r#type = "canonical",
            http.status_code = status.as_u16(),
            http.status_class = status_class(status),
            http.latency_ms = latency.as_millis() as u64,
            "リクエスト完了"
        );
    }
}
