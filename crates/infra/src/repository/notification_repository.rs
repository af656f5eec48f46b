//! # NotificationRepository
//!
//! ユーザー通知の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **所有者スコープ**: 単一取得もユーザー ID で必ず絞り込み、
//!   他ユーザーの通知を参照できないようにする
//! - **新しい順**: 一覧は作成日時の降順で返す

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crewhub_domain::{
   notification::{Notification, NotificationId},
   user::UserId,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::InfraError;

/// 通知リポジトリトレイト
#[async_trait]
pub trait NotificationRepository: Send + Sync {
   /// 指定ユーザーの全通知を作成日時の降順で取得
   async fn find_all_for_user(&self, user_id: &UserId)
   -> Result<Vec<Notification>, InfraError>;

   /// 指定ユーザーが所有する通知を ID で取得
   ///
   /// 通知が存在しても所有者が異なる場合は `Ok(None)` を返す。
   async fn find_for_user(
      &self,
      user_id: &UserId,
      id: &NotificationId,
   ) -> Result<Option<Notification>, InfraError>;

   /// 通知を更新（read_at の永続化）
   async fn update(&self, notification: &Notification) -> Result<(), InfraError>;
}

/// notifications テーブルの行
#[derive(Debug, FromRow)]
struct NotificationRow {
   id:         Uuid,
   user_id:    Uuid,
   message:    String,
   read_at:    Option<DateTime<Utc>>,
   created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
   fn from(row: NotificationRow) -> Self {
      Notification::from_db(
         NotificationId::from_uuid(row.id),
         UserId::from_uuid(row.user_id),
         row.message,
         row.read_at,
         row.created_at,
      )
   }
}

/// PostgreSQL 実装の NotificationRepository
#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
   pool: PgPool,
}

impl PostgresNotificationRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
   async fn find_all_for_user(
      &self,
      user_id: &UserId,
   ) -> Result<Vec<Notification>, InfraError> {
      let rows = sqlx::query_as::<_, NotificationRow>(
         r#"
            SELECT id, user_id, message, read_at, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
      )
      .bind(user_id.as_uuid())
      .fetch_all(&self.pool)
      .await?;

      Ok(rows.into_iter().map(Notification::from).collect())
   }

   async fn find_for_user(
      &self,
      user_id: &UserId,
      id: &NotificationId,
   ) -> Result<Option<Notification>, InfraError> {
      let row = sqlx::query_as::<_, NotificationRow>(
         r#"
            SELECT id, user_id, message, read_at, created_at
            FROM notifications
            WHERE id = $1 AND user_id = $2
            "#,
      )
      .bind(id.as_uuid())
      .bind(user_id.as_uuid())
      .fetch_optional(&self.pool)
      .await?;

      Ok(row.map(Notification::from))
   }

   async fn update(&self, notification: &Notification) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            UPDATE notifications
            SET read_at = $2
            WHERE id = $1
            "#,
      )
      .bind(notification.id().as_uuid())
      .bind(notification.read_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_トレイトはsendとsyncを実装している() {
      fn assert_send_sync<T: Send + Sync>() {}
      assert_send_sync::<PostgresNotificationRepository>();
   }

   #[test]
   fn test_notification_rowから通知へ変換できる() {
      let now = Utc::now();
      let row = NotificationRow {
         id:         Uuid::now_v7(),
         user_id:    Uuid::now_v7(),
         message:    "支給が確定しました".to_string(),
         read_at:    None,
         created_at: now,
      };

      let notification = Notification::from(row);
      assert!(!notification.is_read());
      assert_eq!(notification.message(), "支給が確定しました");
   }
}
