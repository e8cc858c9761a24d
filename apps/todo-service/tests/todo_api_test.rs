//! Todo API の統合テスト
//!
//! 本番と同じルーター・ミドルウェア構成に、インメモリリポジトリを
//! 組み合わせてエンドポイントを検証する。

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use todoflow_service::test_utils::TodoTestApp;

/// RFC 3339 の文字列を日時に変換する
fn at(value: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value.as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc)
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ===== ヘルスチェック =====

#[tokio::test]
async fn test_health_okを返す() {
    let app = TodoTestApp::new();

    let res = app.get("/api/v1/health").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_readiness_データベースに到達できなければ503() {
    let app = TodoTestApp::new();

    let res = app.get("/api/v1/health/ready").await;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        res.body,
        json!({ "status": "not_ready", "checks": { "database": "error" } })
    );
}

// ===== Request ID =====

#[tokio::test]
async fn test_レスポンスにx_request_idが付与される() {
    let app = TodoTestApp::new();

    let res = app.get("/api/v1/health").await;

    let request_id = res.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn test_クライアントのx_request_idはそのまま返される() {
    let app = TodoTestApp::new();

    let res = app
        .send(
            Method::GET,
            "/api/v1/todos",
            None,
            &[("x-request-id", "client-req-1")],
        )
        .await;

    assert_eq!(res.headers.get("x-request-id").unwrap(), "client-req-1");
}

// ===== 一連の操作 =====

#[tokio::test]
async fn test_作成_取得_更新_削除_取得の一連の操作() {
    let app = TodoTestApp::new();

    // 作成
    let created = app
        .post(
            "/api/v1/todos",
            r#"{"title": "Watch CSSE6400 Lecture", "description": "Watch the lecture on ECHO360", "completed": true, "deadline_at": "2023-02-27T00:00:00"}"#,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();
    assert_eq!(created.body["deadline_at"], json!("2023-02-27T00:00:00Z"));

    // 取得
    let fetched = app.get(&format!("/api/v1/todos/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);

    // 更新
    let updated = app
        .put(
            &format!("/api/v1/todos/{id}"),
            r#"{"title": "Watch CSSE6400 Lecture", "completed": false}"#,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["completed"], json!(false));
    assert_eq!(updated.body["description"], created.body["description"]);
    assert_eq!(updated.body["deadline_at"], created.body["deadline_at"]);
    assert_eq!(updated.body["created_at"], created.body["created_at"]);
    assert!(at(&updated.body["updated_at"]) > at(&created.body["updated_at"]));

    // 削除
    let deleted = app.delete(&format!("/api/v1/todos/{id}")).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, updated.body);

    // 削除後の取得
    let missing = app.get(&format!("/api/v1/todos/{id}")).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body, json!({ "error": "Todo not found" }));
}

// ===== 作成 =====

#[tokio::test]
async fn test_作成_タイトルのみなら既定値で作成され時刻が一致する() {
    let app = TodoTestApp::new();

    let res = app.post("/api/v1/todos", r#"{"title": "A"}"#).await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["completed"], json!(false));
    assert_eq!(res.body["description"], Value::Null);
    assert_eq!(res.body["deadline_at"], Value::Null);
    assert_eq!(res.body["created_at"], res.body["updated_at"]);
    assert_eq!(res.body["created_at"], json!(rfc3339(app.start())));
}

#[tokio::test]
async fn test_作成_余分なキーがあれば400で何も作らない() {
    let app = TodoTestApp::new();

    let res = app
        .post("/api/v1/todos", r#"{"title": "A", "owner": "me"}"#)
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "invalid json" }));
    assert!(app.repo().todos().is_empty());
}

#[tokio::test]
async fn test_作成_タイトルがなければ400で何も作らない() {
    let app = TodoTestApp::new();

    let res = app
        .post("/api/v1/todos", r#"{"description": "no title"}"#)
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "No title given" }));
    assert!(app.repo().todos().is_empty());
}

#[tokio::test]
async fn test_作成_不正な期限は400() {
    let app = TodoTestApp::new();

    let res = app
        .post("/api/v1/todos", r#"{"title": "A", "deadline_at": "tomorrow"}"#)
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "invalid deadline_at" }));
    assert!(app.repo().todos().is_empty());
}

// ===== 取得 =====

#[tokio::test]
async fn test_取得_存在しないidは404() {
    let app = TodoTestApp::new();

    let res = app.get("/api/v1/todos/999").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({ "error": "Todo not found" }));
}

#[rstest]
#[case(Method::GET)]
#[case(Method::PUT)]
#[case(Method::DELETE)]
#[tokio::test]
async fn test_数値でないidはjsonの400(#[case] method: Method) {
    let app = TodoTestApp::new();

    let res = app
        .send(method, "/api/v1/todos/abc", Some(r#"{"title": "A"}"#), &[])
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "invalid id" }));
}

#[tokio::test]
async fn test_取得_i64に収まらないidは404() {
    let app = TodoTestApp::new();

    let res = app.get("/api/v1/todos/99999999999999999999").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({ "error": "Todo not found" }));
}

// ===== 更新 =====

#[tokio::test]
async fn test_更新_タイトルがなければ400で保存済みの値は変わらない() {
    let app = TodoTestApp::new();
    let created = app.post("/api/v1/todos", r#"{"title": "A"}"#).await;
    let before = app.repo().todos();

    let res = app.put("/api/v1/todos/1", r#"{"completed": true}"#).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "Todo requires title" }));
    assert_eq!(app.repo().todos(), before);
    assert_eq!(app.get("/api/v1/todos/1").await.body, created.body);
}

#[tokio::test]
async fn test_更新_存在しないidは404() {
    let app = TodoTestApp::new();

    let res = app.put("/api/v1/todos/3", r#"{"title": "A"}"#).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({ "error": "Todo not found" }));
}

#[rstest]
#[case("not json")]
#[case(r#"{"title": 5}"#)]
#[tokio::test]
async fn test_更新_存在しないidは不正なボディでも404(#[case] body: &str) {
    let app = TodoTestApp::new();

    let res = app.put("/api/v1/todos/999", body).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, json!({ "error": "Todo not found" }));
}

#[tokio::test]
async fn test_更新_nullで説明と期限を削除できる() {
    let app = TodoTestApp::new();
    app.post(
        "/api/v1/todos",
        r#"{"title": "A", "description": "d", "deadline_at": "2023-02-27"}"#,
    )
    .await;

    let res = app
        .put(
            "/api/v1/todos/1",
            r#"{"title": "A", "description": null, "deadline_at": null}"#,
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["description"], Value::Null);
    assert_eq!(res.body["deadline_at"], Value::Null);
}

// ===== 一覧 =====

/// completed と期限の異なる Todo を作成する
///
/// | id | completed | deadline_at |
/// |----|-----------|-------------|
/// | 1 | false | start + 1 日 |
/// | 2 | true | start + 1 日 |
/// | 3 | false | start + 30 日 |
/// | 4 | false | なし |
async fn seed(app: &TodoTestApp) {
    let soon = rfc3339(app.start() + Duration::days(1));
    let later = rfc3339(app.start() + Duration::days(30));
    let bodies = [
        json!({ "title": "A", "completed": false, "deadline_at": soon }),
        json!({ "title": "B", "completed": true, "deadline_at": soon }),
        json!({ "title": "C", "completed": false, "deadline_at": later }),
        json!({ "title": "D" }),
    ];
    for body in bodies {
        let res = app.post("/api/v1/todos", &body.to_string()).await;
        assert_eq!(res.status, StatusCode::CREATED);
    }
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

#[rstest]
#[case("/api/v1/todos", vec![1, 2, 3, 4])]
#[case("/api/v1/todos?completed=true", vec![2])]
#[case("/api/v1/todos?completed=false", vec![1, 3, 4])]
#[case("/api/v1/todos?completed=maybe", vec![1, 2, 3, 4])]
#[case("/api/v1/todos?window=7", vec![1, 2])]
#[case("/api/v1/todos?window=", vec![1, 2, 3, 4])]
#[case("/api/v1/todos?completed=false&window=7", vec![1])]
#[case("/api/v1/todos?window=365", vec![1, 2, 3])]
#[case("/api/v1/todos?completed=true&completed=false", vec![2])]
#[tokio::test]
async fn test_一覧_絞り込み条件はandで合成される(#[case] uri: &str, #[case] expected: Vec<i64>) {
    let app = TodoTestApp::new();
    seed(&app).await;

    let res = app.get(uri).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.body), expected);
}

#[rstest]
#[case("-1")]
#[case("abc")]
#[tokio::test]
async fn test_一覧_不正なwindowは400(#[case] window: &str) {
    let app = TodoTestApp::new();

    let res = app.get(&format!("/api/v1/todos?window={window}")).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({ "error": "invalid window" }));
}

// ===== 削除 =====

#[tokio::test]
async fn test_削除_存在しないidは200で空オブジェクト() {
    let app = TodoTestApp::new();

    let res = app.delete("/api/v1/todos/42").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({}));
}
