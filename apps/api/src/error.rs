//! # API エラー定義
//!
//! API サービス固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス |
//! |-----------|----------------|
//! | `Validation` | 400 Bad Request |
//! | `Unauthorized` | 401 Unauthorized |
//! | `Forbidden` | 403 Forbidden |
//! | `NotFound` | 404 Not Found |
//! | `Conflict` | 409 Conflict |
//! | `Database` / `Internal` | 500 Internal Server Error |
//!
//! すべてのレスポンス分岐が明示的なステータスコードを持つ。
//! 500 系は詳細をログに出力し、クライアントには固定メッセージのみ返す。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use crewhub_domain::DomainError;
use crewhub_shared::ErrorResponse;
use thiserror::Error;

/// API サービスで発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// 不正なリクエスト（入力値の検証失敗）
   #[error("バリデーションエラー: {0}")]
   Validation(String),

   /// 認証エラー（プリンシパルを特定できない）
   #[error("認証エラー: {0}")]
   Unauthorized(String),

   /// 権限不足（プリンシパルは特定できたが、ケーパビリティがない）
   #[error("権限がありません: {0}")]
   Forbidden(String),

   /// リソースが見つからない
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// 競合（一意制約との衝突）
   #[error("競合が発生しました: {0}")]
   Conflict(String),

   /// データベースエラー
   #[error("データベースエラー: {0}")]
   Database(#[from] crewhub_infra::InfraError),

   /// 内部エラー
   #[error("内部エラー: {0}")]
   Internal(String),
}

impl From<DomainError> for ApiError {
   fn from(e: DomainError) -> Self {
      match e {
         DomainError::Validation(msg) => ApiError::Validation(msg),
         e @ DomainError::NotFound { .. } => ApiError::NotFound(e.to_string()),
         DomainError::Conflict(msg) => ApiError::Conflict(msg),
      }
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      let (status, message) = match &self {
         ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
         ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
         ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
         ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
         ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
         ApiError::Database(e) => {
            tracing::error!("データベースエラー: {}", e);
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               "内部エラーが発生しました".to_string(),
            )
         }
         ApiError::Internal(msg) => {
            tracing::error!("内部エラー: {}", msg);
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               "内部エラーが発生しました".to_string(),
            )
         }
      };

      (status, Json(ErrorResponse::new(message))).into_response()
   }
}
