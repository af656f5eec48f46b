//! # CrewHub API サーバー
//!
//! ユーザー管理・通知・トークン検証を提供する HTTP API。
//!
//! ## 役割
//!
//! - **ユーザー管理**: CRUD と作成ペイロードのドライランバリデーション
//! - **通知**: 認証済みユーザー自身の通知一覧と既読化
//! - **トークン検証**: アクセストークンの有効性チェック
//!
//! ## 認証・認可
//!
//! `/api` 配下のルートは Bearer トークン認証が必須。
//! ユーザーの更新・削除は `users:manage` ケーパビリティを要求する。
//! `/auth/token/check` と `/health*` は公開エンドポイント。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p crewhub-api
//!
//! # 本番環境
//! API_PORT=3000 DATABASE_URL=postgres://... cargo run -p crewhub-api --release
//! ```

mod config;
mod error;
mod handler;
mod middleware;
mod usecase;

use std::{net::SocketAddr, sync::Arc};

use axum::{
   Router,
   middleware::from_fn_with_state,
   routing::{get, post, put},
};
use config::ApiConfig;
use crewhub_domain::{clock::SystemClock, role::Capability};
use crewhub_infra::{
   db,
   repository::{
      PostgresAccessTokenRepository,
      PostgresNotificationRepository,
      PostgresUserRepository,
   },
};
use handler::{
   NotificationState,
   ReadinessState,
   TokenState,
   UserState,
   check_token,
   create_user,
   delete_user,
   get_notifications,
   get_user,
   health_check,
   list_users,
   read_notification,
   readiness_check,
   update_user,
   validate_user,
};
use middleware::{AuthState, CapabilityState, authenticate, require_capability};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usecase::UserUseCaseImpl;

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   // トレーシング初期化
   tracing_subscriber::registry()
      .with(
         tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,crewhub=debug".into()),
      )
      .with(tracing_subscriber::fmt::layer())
      .init();

   // 設定読み込み
   let config = ApiConfig::from_env().expect("設定の読み込みに失敗しました");

   tracing::info!(
      "API サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   // データベース接続プールを作成し、マイグレーションを適用
   let pool = db::create_pool(&config.database_url)
      .await
      .expect("データベース接続に失敗しました");
   db::run_migrations(&pool)
      .await
      .expect("マイグレーションの適用に失敗しました");
   tracing::info!("データベースに接続しました");

   // 依存コンポーネントを初期化
   let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
   let token_repository = Arc::new(PostgresAccessTokenRepository::new(pool.clone()));
   let notification_repository = Arc::new(PostgresNotificationRepository::new(pool.clone()));
   let clock = Arc::new(SystemClock);

   let user_usecase = UserUseCaseImpl::new(user_repository.clone(), clock.clone());
   let user_state = Arc::new(UserState {
      user_repository: user_repository.clone(),
      usecase:         user_usecase,
   });
   let notification_state = Arc::new(NotificationState {
      notification_repository,
      clock,
   });
   let token_state = Arc::new(TokenState {
      token_repository: token_repository.clone(),
   });
   let readiness_state = Arc::new(ReadinessState { pool });

   let auth_state = AuthState {
      token_repository,
      user_repository,
   };
   let manage_users = CapabilityState {
      required: Capability::new("users:manage"),
   };

   // ユーザーの更新・削除は users:manage ケーパビリティを要求する
   let managed_user_routes = Router::new()
      .route("/api/users/{user_id}", put(update_user).delete(delete_user))
      .layer(from_fn_with_state(manage_users, require_capability))
      .with_state(user_state.clone());

   // /api 配下は Bearer トークン認証が必須
   let api_routes = Router::new()
      .route("/api/users", get(list_users).post(create_user))
      .route("/api/users/validate", post(validate_user))
      .route("/api/users/{user_id}", get(get_user))
      .with_state(user_state)
      .route("/api/notifications", get(get_notifications))
      .route(
         "/api/notifications/{notification_id}/read",
         post(read_notification),
      )
      .with_state(notification_state)
      .merge(managed_user_routes)
      .layer(from_fn_with_state(auth_state, authenticate));

   // ルーター構築
   let app = Router::new()
      .route("/health", get(health_check))
      .route("/health/ready", get(readiness_check))
      .with_state(readiness_state)
      .route("/auth/token/check", post(check_token))
      .with_state(token_state)
      .merge(api_routes)
      .layer(TraceLayer::new_for_http());

   // サーバー起動
   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .expect("アドレスのパースに失敗しました");

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("API サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
