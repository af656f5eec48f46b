//! # UserRepository
//!
//! ユーザー情報と関連コレクションの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **ロールの一括取得**: N+1 問題を避けるため JOIN で取得
//! - **物理削除**: DELETE は行を完全に削除する（論理削除なし）

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crewhub_domain::{
   role::{Capability, Role, RoleId},
   user::{Account, AccountId, Email, Payout, PayoutId, Project, ProjectId, User, UserId,
          UserName, UserRelations},
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
///
/// ユーザー情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ハンドラ・ユースケース層から利用する。
#[async_trait]
pub trait UserRepository: Send + Sync {
   /// 全ユーザーをロール付きで取得（一覧表示用）
   ///
   /// ロールは JOIN で一括取得し、作成日時の昇順で返す。
   async fn find_all_with_roles(&self) -> Result<Vec<(User, Vec<Role>)>, InfraError>;

   /// ID でユーザーを検索
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(user))`: ユーザーが見つかった場合
   /// - `Ok(None)`: ユーザーが見つからない場合
   /// - `Err(_)`: データベースエラー
   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

   /// メールアドレスでユーザーを検索
   ///
   /// 作成・更新時の重複チェックに使用する。
   async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError>;

   /// ユーザーをロール付きで取得
   ///
   /// 認証ミドルウェアがプリンシパルのケーパビリティ解決に使用する。
   async fn find_with_roles(&self, id: &UserId) -> Result<Option<(User, Vec<Role>)>, InfraError>;

   /// ユーザーを全関連コレクション付きで取得（詳細表示用）
   ///
   /// ロール・口座・プロジェクト・支給を一括で取得する。
   async fn find_detail(&self, id: &UserId)
   -> Result<Option<(User, UserRelations)>, InfraError>;

   /// ユーザーを挿入
   async fn insert(&self, user: &User) -> Result<(), InfraError>;

   /// ユーザーを更新（name, email, updated_at）
   async fn update(&self, user: &User) -> Result<(), InfraError>;

   /// ユーザーを削除し、削除した行数を返す
   async fn delete(&self, id: &UserId) -> Result<u64, InfraError>;
}

// ===== 行構造体 =====

/// users テーブルの行
///
/// `TryFrom` で `User` への変換ロジックを一箇所に集約する。
#[derive(Debug, FromRow)]
struct UserRow {
   id:         Uuid,
   name:       String,
   email:      String,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
   type Error = InfraError;

   fn try_from(row: UserRow) -> Result<Self, Self::Error> {
      Ok(User::from_db(
         UserId::from_uuid(row.id),
         UserName::new(&row.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
         Email::new(&row.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
         row.created_at,
         row.updated_at,
      ))
   }
}

/// roles テーブルの行（user_roles 経由の JOIN 結果）
#[derive(Debug, FromRow)]
struct UserRoleRow {
   user_id:      Uuid,
   id:           Uuid,
   name:         String,
   capabilities: serde_json::Value,
   created_at:   DateTime<Utc>,
}

impl UserRoleRow {
   fn into_role(self) -> Result<Role, InfraError> {
      let capabilities: Vec<String> = serde_json::from_value(self.capabilities)?;
      Ok(Role::from_db(
         RoleId::from_uuid(self.id),
         self.name,
         capabilities.into_iter().map(Capability::new).collect(),
         self.created_at,
      ))
   }
}

#[derive(Debug, FromRow)]
struct AccountRow {
   id:    Uuid,
   label: String,
}

#[derive(Debug, FromRow)]
struct ProjectRow {
   id:   Uuid,
   name: String,
}

#[derive(Debug, FromRow)]
struct PayoutRow {
   id:           Uuid,
   amount_cents: i64,
   paid_at:      DateTime<Utc>,
}

// ===== PostgreSQL 実装 =====

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
   pool: PgPool,
}

impl PostgresUserRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }

   /// 指定ユーザーのロール一覧を取得する
   async fn roles_for(&self, id: &UserId) -> Result<Vec<Role>, InfraError> {
      let rows = sqlx::query_as::<_, UserRoleRow>(
         r#"
            SELECT
                ur.user_id,
                r.id,
                r.name,
                r.capabilities,
                r.created_at
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
      )
      .bind(id.as_uuid())
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(UserRoleRow::into_role).collect()
   }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
   async fn find_all_with_roles(&self) -> Result<Vec<(User, Vec<Role>)>, InfraError> {
      let user_rows = sqlx::query_as::<_, UserRow>(
         r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            ORDER BY created_at
            "#,
      )
      .fetch_all(&self.pool)
      .await?;

      // ロールを JOIN で一括取得し、ユーザー ID ごとにまとめる
      let role_rows = sqlx::query_as::<_, UserRoleRow>(
         r#"
            SELECT
                ur.user_id,
                r.id,
                r.name,
                r.capabilities,
                r.created_at
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_id = r.id
            ORDER BY r.name
            "#,
      )
      .fetch_all(&self.pool)
      .await?;

      let mut roles_by_user: HashMap<Uuid, Vec<Role>> = HashMap::new();
      for row in role_rows {
         let user_id = row.user_id;
         roles_by_user
            .entry(user_id)
            .or_default()
            .push(row.into_role()?);
      }

      user_rows
         .into_iter()
         .map(|row| {
            let roles = roles_by_user.remove(&row.id).unwrap_or_default();
            Ok((User::try_from(row)?, roles))
         })
         .collect()
   }

   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
      let row = sqlx::query_as::<_, UserRow>(
         r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
      )
      .bind(id.as_uuid())
      .fetch_optional(&self.pool)
      .await?;

      row.map(User::try_from).transpose()
   }

   async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
      let row = sqlx::query_as::<_, UserRow>(
         r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
      )
      .bind(email.as_str())
      .fetch_optional(&self.pool)
      .await?;

      row.map(User::try_from).transpose()
   }

   async fn find_with_roles(&self, id: &UserId) -> Result<Option<(User, Vec<Role>)>, InfraError> {
      let Some(user) = self.find_by_id(id).await? else {
         return Ok(None);
      };

      let roles = self.roles_for(id).await?;
      Ok(Some((user, roles)))
   }

   async fn find_detail(
      &self,
      id: &UserId,
   ) -> Result<Option<(User, UserRelations)>, InfraError> {
      let Some(user) = self.find_by_id(id).await? else {
         return Ok(None);
      };

      let roles = self.roles_for(id).await?;

      let accounts = sqlx::query_as::<_, AccountRow>(
         r#"
            SELECT id, label
            FROM accounts
            WHERE user_id = $1
            ORDER BY label
            "#,
      )
      .bind(id.as_uuid())
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(|row| Account {
         id:    AccountId::from_uuid(row.id),
         label: row.label,
      })
      .collect();

      let projects = sqlx::query_as::<_, ProjectRow>(
         r#"
            SELECT id, name
            FROM projects
            WHERE user_id = $1
            ORDER BY name
            "#,
      )
      .bind(id.as_uuid())
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(|row| Project {
         id:   ProjectId::from_uuid(row.id),
         name: row.name,
      })
      .collect();

      let payouts = sqlx::query_as::<_, PayoutRow>(
         r#"
            SELECT id, amount_cents, paid_at
            FROM payouts
            WHERE user_id = $1
            ORDER BY paid_at DESC
            "#,
      )
      .bind(id.as_uuid())
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(|row| Payout {
         id:           PayoutId::from_uuid(row.id),
         amount_cents: row.amount_cents,
         paid_at:      row.paid_at,
      })
      .collect();

      Ok(Some((
         user,
         UserRelations {
            roles,
            accounts,
            projects,
            payouts,
         },
      )))
   }

   async fn insert(&self, user: &User) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO users (id, name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
      )
      .bind(user.id().as_uuid())
      .bind(user.name().as_str())
      .bind(user.email().as_str())
      .bind(user.created_at())
      .bind(user.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   async fn update(&self, user: &User) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            UPDATE users
            SET name = $2, email = $3, updated_at = $4
            WHERE id = $1
            "#,
      )
      .bind(user.id().as_uuid())
      .bind(user.name().as_str())
      .bind(user.email().as_str())
      .bind(user.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   async fn delete(&self, id: &UserId) -> Result<u64, InfraError> {
      let result = sqlx::query("DELETE FROM users WHERE id = $1")
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(result.rows_affected())
   }
}
