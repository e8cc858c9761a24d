//! # アプリケーション構築
//!
//! State を受け取り、ルーターとミドルウェアを組み立てる。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{Router, routing::get};
use todoflow_shared::{
    canonical_log::CanonicalLogLine,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{
    ReadinessState,
    TodoState,
    create_todo,
    delete_todo,
    get_todo,
    health_check,
    list_todos,
    readiness_check,
    update_todo,
};

/// すべてのエンドポイントに付くパスプレフィックス
pub const API_PREFIX: &str = "/api/v1";

/// ルーターを構築する
///
/// TraceLayer（リクエストスパンと Canonical Log Line）は Todo API にだけ掛ける。
/// ヘルスチェックは高頻度で呼ばれるため対象外。
pub fn build_app(todo_state: Arc<TodoState>, readiness_state: Arc<ReadinessState>) -> Router {
    let todos = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(todo_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(CanonicalLogLine),
        );

    let api = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(todos);

    // レイヤーは下から順に適用される（最後に追加したものが最外）:
    // 1. SetRequestIdLayer: UUID v7 を生成（クライアント提供値があればそれを使う）
    // 2. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
    Router::new()
        .nest(API_PREFIX, api)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
