//! # ユーザーハンドラ
//!
//! ユーザー CRUD とドライランバリデーションの API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /api/users` - ユーザー一覧（ロール名付き）
//! - `POST /api/users` - ユーザー作成
//! - `POST /api/users/validate` - 作成ペイロードの検証のみ（保存しない）
//! - `GET /api/users/{user_id}` - ユーザー詳細（関連データ付き）
//! - `PUT /api/users/{user_id}` - ユーザー更新
//! - `DELETE /api/users/{user_id}` - ユーザー削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use crewhub_domain::user::{Account, Email, Payout, Project, User, UserId, UserName};
use crewhub_infra::repository::UserRepository;
use crewhub_shared::{ApiResponse, ErrorResponse, MessageResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    usecase::user::{CreateUserInput, UpdateUserInput, UserUseCaseImpl},
};

/// ユーザー API の共有状態
pub struct UserState {
    pub user_repository: Arc<dyn UserRepository>,
    pub usecase:         UserUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// ユーザー作成リクエスト
///
/// 受け付けるフィールドはここに列挙したものだけ。
/// ボディの未知のフィールドはエンティティに到達しない。
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name:  String,
    pub email: String,
}

/// ユーザー更新リクエスト（部分更新）
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name:  Option<String>,
    pub email: Option<String>,
}

/// ユーザー情報レスポンス
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id:         Uuid,
    pub name:       String,
    pub email:      String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id:         *user.id().as_uuid(),
            name:       user.name().as_str().to_string(),
            email:      user.email().as_str().to_string(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// ユーザー一覧の要素 DTO
#[derive(Debug, Serialize)]
pub struct UserItemDto {
    pub id:         Uuid,
    pub name:       String,
    pub email:      String,
    pub roles:      Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// ユーザー詳細 DTO（関連データ付き）
#[derive(Debug, Serialize)]
pub struct UserDetailDto {
    pub id:         Uuid,
    pub name:       String,
    pub email:      String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub roles:      Vec<String>,
    pub accounts:   Vec<Account>,
    pub projects:   Vec<Project>,
    pub payouts:    Vec<Payout>,
}

/// バリデーション結果 DTO
#[derive(Debug, Serialize)]
pub struct ValidationResultDto {
    pub valid:  bool,
    pub errors: Vec<String>,
}

/// 作成ペイロードを検証し、エラーメッセージを収集する
fn validate_create_request(req: &CreateUserRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if let Err(e) = UserName::new(&req.name) {
        errors.push(e.to_string());
    }
    if let Err(e) = Email::new(&req.email) {
        errors.push(e.to_string());
    }

    errors
}

// --- ハンドラ ---

/// GET /api/users
///
/// ユーザー一覧をロール名付きで取得する。
///
/// ## レスポンス
///
/// - `200 OK`: ユーザー一覧
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<Arc<UserState>>) -> impl IntoResponse {
    let users = match state.user_repository.find_all_with_roles().await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("ユーザー一覧取得で内部エラー: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("内部エラーが発生しました")),
            )
                .into_response();
        }
    };

    let items: Vec<UserItemDto> = users
        .iter()
        .map(|(user, roles)| UserItemDto {
            id:         *user.id().as_uuid(),
            name:       user.name().as_str().to_string(),
            email:      user.email().as_str().to_string(),
            roles:      roles.iter().map(|r| r.name().to_string()).collect(),
            created_at: user.created_at(),
        })
        .collect();

    (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
}

/// POST /api/users
///
/// ユーザーを作成する。
///
/// ## リクエストボディ
///
/// - `name`: ユーザー名
/// - `email`: メールアドレス
///
/// ## レスポンス
///
/// - `201 Created`: 作成されたユーザー情報
/// - `400 Bad Request`: バリデーションエラー
/// - `409 Conflict`: メールアドレスが既に使用されている
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<Arc<UserState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = UserName::new(&req.name).map_err(|e| ApiError::Validation(e.to_string()))?;
    let email = Email::new(&req.email).map_err(|e| ApiError::Validation(e.to_string()))?;

    let user = state
        .usecase
        .create_user(CreateUserInput { name, email })
        .await?;

    let response = ApiResponse::success(UserResponse::from(&user));
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/users/validate
///
/// 作成ペイロードを検証する。ストアには一切触れない。
///
/// ## レスポンス
///
/// - `200 OK`: `data: {valid, errors}` の検証結果（失敗時も 200）
#[tracing::instrument(skip_all)]
pub async fn validate_user(Json(req): Json<CreateUserRequest>) -> impl IntoResponse {
    let errors = validate_create_request(&req);

    let result = ValidationResultDto {
        valid: errors.is_empty(),
        errors,
    };

    (StatusCode::OK, Json(ApiResponse::success(result)))
}

/// GET /api/users/{user_id}
///
/// ユーザー詳細を関連データ（ロール、口座、プロジェクト、支給）付きで取得する。
///
/// ## レスポンス
///
/// - `200 OK`: ユーザー詳細
/// - `404 Not Found`: ユーザーが見つからない
#[tracing::instrument(skip_all, fields(%user_id))]
pub async fn get_user(
    State(state): State<Arc<UserState>>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let user_id = UserId::from_uuid(user_id);

    match state.user_repository.find_detail(&user_id).await {
        Ok(Some((user, relations))) => {
            let detail = UserDetailDto {
                id:         *user.id().as_uuid(),
                name:       user.name().as_str().to_string(),
                email:      user.email().as_str().to_string(),
                created_at: user.created_at(),
                updated_at: user.updated_at(),
                roles:      relations.roles.iter().map(|r| r.name().to_string()).collect(),
                accounts:   relations.accounts,
                projects:   relations.projects,
                payouts:    relations.payouts,
            };
            (StatusCode::OK, Json(ApiResponse::success(detail))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("User not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("ユーザー詳細取得で内部エラー: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("内部エラーが発生しました")),
            )
                .into_response()
        }
    }
}

/// PUT /api/users/{user_id}
///
/// ユーザー情報を部分更新する。
///
/// ## リクエストボディ
///
/// - `name`: ユーザー名（省略可）
/// - `email`: メールアドレス（省略可）
///
/// ## レスポンス
///
/// - `200 OK`: 更新後のユーザー情報
/// - `400 Bad Request`: バリデーションエラー
/// - `404 Not Found`: ユーザーが見つからない
/// - `409 Conflict`: メールアドレスが他のユーザーに使用されている
#[tracing::instrument(skip_all, fields(%user_id))]
pub async fn update_user(
    State(state): State<Arc<UserState>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req
        .name
        .map(UserName::new)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let email = req
        .email
        .map(Email::new)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let user = state
        .usecase
        .update_user(UpdateUserInput {
            user_id: UserId::from_uuid(user_id),
            name,
            email,
        })
        .await?;

    let response = ApiResponse::success(UserResponse::from(&user));
    Ok((StatusCode::OK, Json(response)))
}

/// DELETE /api/users/{user_id}
///
/// ユーザーを削除する。関連データはカスケードで削除される。
///
/// ## レスポンス
///
/// - `200 OK`: 削除成功メッセージ
/// - `404 Not Found`: ユーザーが見つからない
#[tracing::instrument(skip_all, fields(%user_id))]
pub async fn delete_user(
    State(state): State<Arc<UserState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .usecase
        .delete_user(&UserId::from_uuid(user_id))
        .await?;

    let response = MessageResponse::success("User deleted successfully");
    Ok((StatusCode::OK, Json(response)))
}
