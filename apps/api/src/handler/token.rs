//! # トークン検証ハンドラ
//!
//! ボディで渡されたアクセストークンの有効性を返す公開 API。
//!
//! ## エンドポイント
//!
//! - `POST /auth/token/check` - トークン有効性チェック
//!
//! ## レスポンス規約
//!
//! 判定結果にかかわらず HTTP は 200、外側の `status` は常に `"success"`。
//! 判定自体は `data.status` の真偽値で表す。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use crewhub_domain::token::AccessTokenId;
use crewhub_infra::repository::AccessTokenRepository;
use crewhub_shared::{ApiResponse, ErrorResponse};
use serde::{Deserialize, Serialize};

/// トークン API の共有状態
pub struct TokenState {
    pub token_repository: Arc<dyn AccessTokenRepository>,
}

/// トークン検証リクエスト
#[derive(Debug, Deserialize)]
pub struct CheckTokenRequest {
    pub token: String,
}

/// トークン検証の判定結果
#[derive(Debug, Serialize)]
pub struct TokenVerdict {
    pub status: bool,
}

/// POST /auth/token/check
///
/// トークンの有効性を判定する。
///
/// ## レスポンス
///
/// - `200 OK`: `data.status` が `true`（有効）または `false`（未知・失効）
#[tracing::instrument(skip_all)]
pub async fn check_token(
    State(state): State<Arc<TokenState>>,
    Json(req): Json<CheckTokenRequest>,
) -> impl IntoResponse {
    // 形式として成立しないトークンは未知のトークンと同じ扱い
    let Ok(token_id) = AccessTokenId::new(&req.token) else {
        let response = ApiResponse::success(TokenVerdict { status: false });
        return (StatusCode::OK, Json(response)).into_response();
    };

    match state.token_repository.find_by_id(&token_id).await {
        Ok(found) => {
            let status = found.is_some_and(|token| token.is_valid());
            let response = ApiResponse::success(TokenVerdict { status });
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("トークン検証で内部エラー: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("内部エラーが発生しました")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, header},
        routing::post,
    };
    use chrono::Utc;
    use crewhub_domain::{token::AccessToken, user::UserId};
    use crewhub_infra::InfraError;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    // テスト用のスタブ実装

    struct StubTokenRepository {
        token: Option<AccessToken>,
    }

    #[async_trait]
    impl AccessTokenRepository for StubTokenRepository {
        async fn find_by_id(
            &self,
            _id: &AccessTokenId,
        ) -> Result<Option<AccessToken>, InfraError> {
            Ok(self.token.clone())
        }
    }

    // テストデータ生成

    fn create_token(revoked: bool) -> AccessToken {
        AccessToken::from_db(
            AccessTokenId::new("tok-001").unwrap(),
            UserId::new(),
            revoked,
            Utc::now(),
        )
    }

    fn create_test_app(token: Option<AccessToken>) -> Router {
        let state = Arc::new(TokenState {
            token_repository: Arc::new(StubTokenRepository { token }),
        });

        Router::new()
            .route("/auth/token/check", post(check_token))
            .with_state(state)
    }

    fn check_request(token: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/auth/token/check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "token": token }).to_string(),
            ))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    // テストケース

    #[tokio::test]
    async fn test_check_token_有効なトークンはstatusがtrue() {
        let sut = create_test_app(Some(create_token(false)));

        let response = sut.oneshot(check_request("tok-001")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["status"], true);
    }

    #[tokio::test]
    async fn test_check_token_失効したトークンはstatusがfalse() {
        let sut = create_test_app(Some(create_token(true)));

        let response = sut.oneshot(check_request("tok-001")).await.unwrap();

        // HTTP は 200 のまま、判定だけ false
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["status"], false);
    }

    #[tokio::test]
    async fn test_check_token_未知のトークンはstatusがfalse() {
        let sut = create_test_app(None);

        let response = sut.oneshot(check_request("tok-404")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["data"]["status"], false);
    }

    #[tokio::test]
    async fn test_check_token_空のトークンはstatusがfalse() {
        let sut = create_test_app(Some(create_token(false)));

        let response = sut.oneshot(check_request("")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["data"]["status"], false);
    }

    #[tokio::test]
    async fn test_check_token_レスポンスにトークンを含めない() {
        let sut = create_test_app(None);

        let response = sut.oneshot(check_request("tok-404")).await.unwrap();

        let json = response_json(response).await;
        assert!(!json.to_string().contains("tok-404"));
    }
}
