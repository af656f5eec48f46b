//! # 通知
//!
//! ユーザーに紐づく通知エンティティを定義する。
//!
//! ## ライフサイクル
//!
//! 通知は未読（`read_at == None`）で作成され、明示的な既読化操作で
//! 一度だけ既読（`read_at == Some(_)`）に遷移する。それ以上の状態遷移はない。
//! 既読化は冪等であり、既に既読の通知に対しては何も変更しない。

use chrono::{DateTime, Utc};

use crate::user::UserId;

define_uuid_id! {
    /// 通知 ID（一意識別子）
    pub struct NotificationId;
}

/// 通知エンティティ
///
/// ちょうど一人のユーザーに属する。一覧取得時は作成日時の降順で並ぶ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    id:         NotificationId,
    user_id:    UserId,
    message:    String,
    read_at:    Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// 新しい未読通知を作成する
    pub fn new(
        id: NotificationId,
        user_id: UserId,
        message: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            message,
            read_at: None,
            created_at: now,
        }
    }

    /// 既存のデータから通知を復元する（データベースから取得時）
    pub fn from_db(
        id: NotificationId,
        user_id: UserId,
        message: String,
        read_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            message,
            read_at,
            created_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // ビジネスロジックメソッド

    /// 既読か判定する
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// 既読にした新しいインスタンスを返す
    ///
    /// 冪等: 既に既読の場合は最初の `read_at` を保持したまま返す。
    pub fn mark_as_read(self, now: DateTime<Utc>) -> Self {
        if self.read_at.is_some() {
            return self;
        }

        Self {
            read_at: Some(now),
            ..self
        }
    }
}
