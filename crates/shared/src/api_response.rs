//! # API レスポンスエンベロープ
//!
//! 公開 API の統一レスポンス形式を提供する。
//!
//! ## エンベロープ規約
//!
//! すべてのレスポンスはトップレベルに `status` 文字列を持つ JSON オブジェクト:
//!
//! - 成功（データ付き）: `{ "status": "success", "data": <T> }`
//! - 成功（メッセージのみ）: `{ "status": "success", "message": "..." }`
//! - エラー: `{ "status": "error", "message": "..." }`
//!
//! エラー種別から HTTP ステータスコードへのマッピングは各サービスの責務
//! （shared に axum 依存を入れない）。

use serde::{Deserialize, Serialize};

/// `status` フィールドの成功値
const STATUS_SUCCESS: &str = "success";

/// `status` フィールドのエラー値
const STATUS_ERROR: &str = "error";

/// 成功レスポンス型（データ付き）
///
/// すべてのデータを返すエンドポイントは `{ "status": "success", "data": T }`
/// 形式でレスポンスを返す。
///
/// ## 使用例
///
/// ```
/// use crewhub_shared::ApiResponse;
///
/// let response = ApiResponse::success("hello");
/// assert_eq!(response.data, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data:   T,
}

impl<T> ApiResponse<T> {
    /// 新しい成功レスポンスを作成する
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data,
        }
    }
}

/// 成功レスポンス型（メッセージのみ）
///
/// 返すエンティティを持たない操作（削除など）が使用する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status:  String,
    pub message: String,
}

impl MessageResponse {
    /// 新しい成功メッセージレスポンスを作成する
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status:  STATUS_SUCCESS.to_string(),
            message: message.into(),
        }
    }
}

/// エラーレスポンス型
///
/// `{ "status": "error", "message": "..." }` 形式。
/// message は人間可読な説明のみを含み、内部情報を漏らさない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status:  String,
    pub message: String,
}

impl ErrorResponse {
    /// 新しいエラーレスポンスを作成する
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status:  STATUS_ERROR.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_成功レスポンスを正しいjson形状にする() {
        let response = ApiResponse::success("hello");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "status": "success", "data": "hello" })
        );
    }

    #[test]
    fn test_vecペイロードをシリアライズする() {
        let response = ApiResponse::success(vec!["a", "b", "c"]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "status": "success", "data": ["a", "b", "c"] })
        );
    }

    #[test]
    fn test_deserializeでjsonからオブジェクトに変換する() {
        let json = r#"{"status": "success", "data": "world"}"#;
        let response: ApiResponse<String> = serde_json::from_str(json).unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.data, "world");
    }

    #[test]
    fn test_メッセージレスポンスを正しいjson形状にする() {
        let response = MessageResponse::success("User deleted successfully");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "message": "User deleted successfully"
            })
        );
    }

    #[test]
    fn test_エラーレスポンスはstatusがerrorになる() {
        let error = ErrorResponse::new("User not found");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "status": "error", "message": "User not found" })
        );
    }

    #[test]
    fn test_serialize_deserializeのラウンドトリップ() {
        let original = ApiResponse::success(42);
        let json = serde_json::to_string(&original).unwrap();
        let deserialized: ApiResponse<i32> = serde_json::from_str(&json).unwrap();

        assert_eq!(original, deserialized);
    }
}
