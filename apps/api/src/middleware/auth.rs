//! # 認証・認可ミドルウェア
//!
//! Bearer トークンからプリンシパルを解決する認証ミドルウェアと、
//! ケーパビリティベースのアクセス制御を行う認可ミドルウェアを提供する。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let capability_state = CapabilityState {
//!     required: Capability::new("users:manage"),
//! };
//!
//! Router::new()
//!     .route("/api/users/{id}", put(update_user).delete(delete_user))
//!     .layer(from_fn_with_state(capability_state, require_capability))
//!     .layer(from_fn_with_state(auth_state, authenticate))
//! ```
//!
//! `authenticate` が [`CurrentUser`] をリクエスト拡張に挿入し、
//! ハンドラと `require_capability` がそれを参照する。

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use crewhub_domain::{
    role::Capability,
    token::AccessTokenId,
    user::{UserId, UserName},
};
use crewhub_infra::repository::{AccessTokenRepository, UserRepository};
use crewhub_shared::ErrorResponse;

/// 認証済みプリンシパル
///
/// 認証ミドルウェアがリクエスト拡張に挿入し、
/// ハンドラが `Extension<CurrentUser>` で取り出す。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id:      UserId,
    pub name:         UserName,
    pub capabilities: Vec<Capability>,
}

impl CurrentUser {
    /// プリンシパルが要求されたケーパビリティを保持するか判定する
    pub fn has_capability(&self, required: &Capability) -> bool {
        self.capabilities.iter().any(|c| c.satisfies(required))
    }
}

/// 認証ミドルウェアの状態
#[derive(Clone)]
pub struct AuthState {
    pub token_repository: Arc<dyn AccessTokenRepository>,
    pub user_repository:  Arc<dyn UserRepository>,
}

/// 認可ミドルウェアの状態
#[derive(Clone)]
pub struct CapabilityState {
    pub required: Capability,
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}

/// 認証ミドルウェア
///
/// `Authorization: Bearer <token-id>` ヘッダからトークンを取り出し、
/// トークンテーブルと照合してプリンシパルを解決する。
///
/// 以下の場合は 401 Unauthorized を返す:
/// - ヘッダが欠落または形式不正
/// - トークンが存在しない、または失効済み
/// - トークンの所有ユーザーが存在しない
pub async fn authenticate(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // Bearer トークンを取り出す
    let Some(token_value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return unauthorized("認証が必要です");
    };

    let Ok(token_id) = AccessTokenId::new(token_value) else {
        return unauthorized("認証が必要です");
    };

    // トークンを検証する
    let token = match state.token_repository.find_by_id(&token_id).await {
        Ok(Some(token)) if token.is_valid() => token,
        Ok(_) => return unauthorized("トークンが無効です"),
        Err(e) => {
            tracing::error!("トークン検証で内部エラー: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("内部エラーが発生しました")),
            )
                .into_response();
        }
    };

    // プリンシパルをロール付きで解決する
    let (user, roles) = match state.user_repository.find_with_roles(token.user_id()).await {
        Ok(Some(found)) => found,
        Ok(None) => return unauthorized("トークンが無効です"),
        Err(e) => {
            tracing::error!("プリンシパル解決で内部エラー: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("内部エラーが発生しました")),
            )
                .into_response();
        }
    };

    let capabilities = roles
        .iter()
        .flat_map(|r| r.capabilities().iter().cloned())
        .collect();

    request.extensions_mut().insert(CurrentUser {
        user_id: user.id().clone(),
        name: user.name().clone(),
        capabilities,
    });

    next.run(request).await
}

/// 認可ミドルウェア
///
/// プリンシパルが要求されたケーパビリティを保持するか検証する。
/// 保持していない場合は 403 Forbidden を返す。
/// `authenticate` より内側に配置すること（プリンシパル未解決は 401）。
pub async fn require_capability(
    State(state): State<CapabilityState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(current_user) = request.extensions().get::<CurrentUser>() else {
        return unauthorized("認証が必要です");
    };

    if !current_user.has_capability(&state.required) {
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("この操作を実行する権限がありません")),
        )
            .into_response();
    }

    next.run(request).await
}
