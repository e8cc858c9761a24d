//! # Todo Service サーバー
//!
//! Todo の作成・一覧・取得・更新・削除を提供する REST API サーバー。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `TODO_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `TODO_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,todoflow=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! TODO_PORT=6400 DATABASE_URL=postgres://... cargo run -p todoflow-service --release
//! ```

use std::sync::Arc;

use todoflow_domain::clock::SystemClock;
use todoflow_infra::{db, repository::PostgresTodoRepository};
use todoflow_service::{
    app_builder::build_app,
    config::TodoConfig,
    handler::{ReadinessState, TodoState},
    usecase::TodoUseCaseImpl,
};
use todoflow_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tracing::Instrument;

/// Todo Service サーバーのエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 設定の読み込み
/// 4. データベース接続とマイグレーション
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("todo-service"));

    run()
        .instrument(tracing::info_span!("app", service = "todo-service"))
        .await
}

/// 設定の読み込みからサーバー停止までを `app` スパン内で実行する
async fn run() -> anyhow::Result<()> {
    let config = TodoConfig::from_env()?;
    let addr = config.socket_addr()?;

    tracing::info!("Todo Service サーバーを起動します: {}", addr);

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool).await?;
    tracing::info!("マイグレーションを適用しました");

    let usecase = TodoUseCaseImpl::new(
        Arc::new(PostgresTodoRepository::new(pool.clone())),
        Arc::new(SystemClock),
    );
    let app = build_app(
        Arc::new(TodoState { usecase }),
        Arc::new(ReadinessState { pool }),
    );

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Todo Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Todo Service サーバーを停止しました");
    Ok(())
}

/// Ctrl-C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C ハンドラの登録に失敗しました");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗しました");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
