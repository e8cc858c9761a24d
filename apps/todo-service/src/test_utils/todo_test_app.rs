//! Todo API テストアプリ
//!
//! インメモリリポジトリと一定間隔で進む時計を使って、
//! 本番と同じルーター・ミドルウェア構成のアプリケーションを組み立てる。

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use todoflow_domain::clock::SteppingClock;
use todoflow_infra::mock::MockTodoRepository;
use tower::ServiceExt;

use crate::{
    app_builder::build_app,
    handler::{ReadinessState, TodoState},
    usecase::TodoUseCaseImpl,
};

/// 到達できないデータベース（Readiness Check の失敗系に使う）
const UNREACHABLE_DATABASE_URL: &str = "postgres://todoflow@127.0.0.1:1/todoflow";

/// テストアプリへのリクエスト結果
#[derive(Debug)]
pub struct TestResponse {
    pub status:  StatusCode,
    pub headers: HeaderMap,
    pub body:    Value,
}

/// Todo API テストアプリ
///
/// # 使用例
///
/// ```ignore
/// use todoflow_service::test_utils::TodoTestApp;
///
/// #[tokio::test]
/// async fn test_example() {
///     let app = TodoTestApp::new();
///     let res = app.post("/api/v1/todos", r#"{"title": "A"}"#).await;
///     assert_eq!(res.status, StatusCode::CREATED);
/// }
/// ```
pub struct TodoTestApp {
    router: Router,
    repo:   MockTodoRepository,
    start:  DateTime<Utc>,
}

impl TodoTestApp {
    /// 時計は `2023-11-14T22:13:20Z` から始まり、参照のたびに 1 秒進む
    pub fn new() -> Self {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let repo = MockTodoRepository::new();
        let usecase = TodoUseCaseImpl::new(
            Arc::new(repo.clone()),
            Arc::new(SteppingClock::new(start, chrono::Duration::seconds(1))),
        );
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(UNREACHABLE_DATABASE_URL)
            .unwrap();

        let router = build_app(
            Arc::new(TodoState { usecase }),
            Arc::new(ReadinessState { pool }),
        );

        Self {
            router,
            repo,
            start,
        }
    }

    /// 保存先のインメモリリポジトリ
    pub fn repo(&self) -> &MockTodoRepository {
        &self.repo
    }

    /// 時計の開始時刻
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, &[]).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body), &[]).await
    }

    pub async fn put(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), &[]).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, &[]).await
    }

    /// 任意のリクエストを送る
    ///
    /// レスポンスボディが JSON でない場合、`body` は `Value::Null` になる。
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }
}

impl Default for TodoTestApp {
    fn default() -> Self {
        Self::new()
    }
}
