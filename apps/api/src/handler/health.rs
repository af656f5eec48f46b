//! # ヘルスチェックハンドラ
//!
//! API の稼働状態を確認するためのエンドポイント。
//!
//! ## 用途
//!
//! - **ロードバランサー**: ターゲットグループヘルスチェック
//! - **コンテナオーケストレーター**: liveness/readiness probe
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health
//! GET /health/ready
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0"
//! }
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use crewhub_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
use sqlx::PgPool;

/// Readiness Check の共有状態
pub struct ReadinessState {
    pub pool: PgPool,
}

/// ヘルスチェックエンドポイント
///
/// サーバーが正常に稼働していることを確認するためのエンドポイント。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check エンドポイント
///
/// データベースへの接続を確認し、トラフィックを受け付けられる状態か返す。
///
/// ## レスポンス
///
/// - `200 OK`: 全依存サービス稼働中
/// - `503 Service Unavailable`: 一部の依存サービスが利用不可
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let database_result = check_database(&state.pool).await;

    let mut checks = HashMap::new();
    checks.insert("database".to_string(), database_result);

    let all_ok = checks.values().all(|s| matches!(s, CheckStatus::Ok));
    let status = if all_ok {
        ReadinessStatus::Ready
    } else {
        ReadinessStatus::NotReady
    };
    let http_status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(ReadinessResponse { status, checks }))
}

/// データベースへの接続を確認する（タイムアウト: 5 秒）
async fn check_database(pool: &PgPool) -> CheckStatus {
    match tokio::time::timeout(
        Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(pool),
    )
    .await
    {
        Ok(Ok(_)) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: database query failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: database check timed out");
            CheckStatus::Error
        }
    }
}
