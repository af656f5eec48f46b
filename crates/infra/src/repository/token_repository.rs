//! # AccessTokenRepository
//!
//! アイデンティティプロバイダが発行したアクセストークンの参照を担当する
//! リポジトリ。このサービスはトークンを作成・変更しない（読み取り専用）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crewhub_domain::{
   token::{AccessToken, AccessTokenId},
   user::UserId,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::InfraError;

/// アクセストークンリポジトリトレイト
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
   /// トークンを ID で検索
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(token))`: トークンが見つかった場合（失効済みを含む）
   /// - `Ok(None)`: トークンが見つからない場合
   async fn find_by_id(&self, id: &AccessTokenId) -> Result<Option<AccessToken>, InfraError>;
}

/// access_tokens テーブルの行
#[derive(Debug, FromRow)]
struct AccessTokenRow {
   id:         String,
   user_id:    Uuid,
   revoked:    bool,
   created_at: DateTime<Utc>,
}

impl TryFrom<AccessTokenRow> for AccessToken {
   type Error = InfraError;

   fn try_from(row: AccessTokenRow) -> Result<Self, Self::Error> {
      Ok(AccessToken::from_db(
         AccessTokenId::new(row.id).map_err(|e| InfraError::unexpected(e.to_string()))?,
         UserId::from_uuid(row.user_id),
         row.revoked,
         row.created_at,
      ))
   }
}

/// PostgreSQL 実装の AccessTokenRepository
#[derive(Debug, Clone)]
pub struct PostgresAccessTokenRepository {
   pool: PgPool,
}

impl PostgresAccessTokenRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl AccessTokenRepository for PostgresAccessTokenRepository {
   async fn find_by_id(&self, id: &AccessTokenId) -> Result<Option<AccessToken>, InfraError> {
      let row = sqlx::query_as::<_, AccessTokenRow>(
         r#"
            SELECT id, user_id, revoked, created_at
            FROM access_tokens
            WHERE id = $1
            "#,
      )
      .bind(id.as_str())
      .fetch_optional(&self.pool)
      .await?;

      row.map(AccessToken::try_from).transpose()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_トレイトはsendとsyncを実装している() {
      fn assert_send_sync<T: Send + Sync>() {}
      assert_send_sync::<PostgresAccessTokenRepository>();
   }

   #[test]
   fn test_token_rowからトークンへ変換できる() {
      let row = AccessTokenRow {
         id:         "tok-001".to_string(),
         user_id:    Uuid::now_v7(),
         revoked:    false,
         created_at: Utc::now(),
      };

      let token = AccessToken::try_from(row).unwrap();
      assert!(token.is_valid());
   }

   #[test]
   fn test_失効フラグ付きの行は無効なトークンになる() {
      let row = AccessTokenRow {
         id:         "tok-002".to_string(),
         user_id:    Uuid::now_v7(),
         revoked:    true,
         created_at: Utc::now(),
      };

      let token = AccessToken::try_from(row).unwrap();
      assert!(!token.is_valid());
   }
}
