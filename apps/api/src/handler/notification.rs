//! # 通知ハンドラ
//!
//! 認証済みプリンシパル自身の通知を扱う API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /api/notifications` - 自分の通知一覧（新しい順）
//! - `POST /api/notifications/{notification_id}/read` - 既読化

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use crewhub_domain::{clock::Clock, notification::{Notification, NotificationId}};
use crewhub_infra::repository::NotificationRepository;
use crewhub_shared::{ApiResponse, ErrorResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;

/// 通知 API の共有状態
pub struct NotificationState {
    pub notification_repository: Arc<dyn NotificationRepository>,
    pub clock: Arc<dyn Clock>,
}

/// 通知 DTO
#[derive(Debug, Serialize)]
pub struct NotificationDto {
    pub id:         Uuid,
    pub message:    String,
    pub read_at:    Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationDto {
    fn from(notification: &Notification) -> Self {
        Self {
            id:         *notification.id().as_uuid(),
            message:    notification.message().to_string(),
            read_at:    notification.read_at(),
            created_at: notification.created_at(),
        }
    }
}

/// GET /api/notifications
///
/// プリンシパル自身の通知一覧を新しい順で取得する。
///
/// ## レスポンス
///
/// - `200 OK`: 通知一覧
#[tracing::instrument(skip_all)]
pub async fn get_notifications(
    State(state): State<Arc<NotificationState>>,
    Extension(current_user): Extension<CurrentUser>,
) -> impl IntoResponse {
    match state
        .notification_repository
        .find_all_for_user(&current_user.user_id)
        .await
    {
        Ok(notifications) => {
            let items: Vec<NotificationDto> =
                notifications.iter().map(NotificationDto::from).collect();
            (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
        }
        Err(e) => {
            tracing::error!("通知一覧取得で内部エラー: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("内部エラーが発生しました")),
            )
                .into_response()
        }
    }
}

/// POST /api/notifications/{notification_id}/read
///
/// プリンシパル自身の通知を既読にし、更新後の通知を返す。
/// 既読済みの通知に対しては何もしない（冪等）。
///
/// ## レスポンス
///
/// - `200 OK`: 更新後の通知
/// - `404 Not Found`: 通知が存在しない、または他ユーザーの所有
#[tracing::instrument(skip_all, fields(%notification_id))]
pub async fn read_notification(
    State(state): State<Arc<NotificationState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(notification_id): Path<Uuid>,
) -> impl IntoResponse {
    let notification_id = NotificationId::from_uuid(notification_id);

    // 所有者スコープで取得。他ユーザーの通知は存在しないものとして扱う
    let notification = match state
        .notification_repository
        .find_for_user(&current_user.user_id, &notification_id)
        .await
    {
        Ok(Some(notification)) => notification,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("通知が見つかりません")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("通知取得で内部エラー: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("内部エラーが発生しました")),
            )
                .into_response();
        }
    };

    let updated = notification.mark_as_read(state.clock.now());

    if let Err(e) = state.notification_repository.update(&updated).await {
        tracing::error!("通知更新で内部エラー: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("内部エラーが発生しました")),
        )
            .into_response();
    }

    let response = ApiResponse::success(NotificationDto::from(&updated));
    (StatusCode::OK, Json(response)).into_response()
}
