//! # ユーザー
//!
//! ユーザーエンティティと、そのユーザーが所有する関連コレクション
//! （口座・プロジェクト・支給）を定義する。ロールは [`crate::role`] を参照。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: UserId は UUID をラップし、型安全性を確保
//! - **不変性**: エンティティフィールドは基本的に不変、変更はメソッド経由
//! - **バリデーション**: 値オブジェクトの生成時に検証ロジックを実行
//! - **物理削除**: 削除は行の完全な削除であり、論理削除フラグは持たない
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use crewhub_domain::user::{Email, User, UserId, UserName};
//!
//! // 新規ユーザー作成
//! let user = User::new(
//!     UserId::new(),
//!     UserName::new("山田太郎")?,
//!     Email::new("user@example.com")?,
//!     chrono::Utc::now(),
//! );
//!
//! assert_eq!(user.email().as_str(), "user@example.com");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, role::Role};

define_uuid_id! {
    /// ユーザー ID（一意識別子）
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    /// Newtype パターンで型安全性を確保。
    pub struct UserId;
}

define_uuid_id! {
    /// 口座 ID（一意識別子）
    pub struct AccountId;
}

define_uuid_id! {
    /// プロジェクト ID（一意識別子）
    pub struct ProjectId;
}

define_uuid_id! {
    /// 支給 ID（一意識別子）
    pub struct PayoutId;
}

define_validated_string! {
    /// ユーザー名（値オブジェクト）
    ///
    /// 1〜100 文字。個人情報のため Debug 出力はマスクされる。
    pub struct UserName {
        label: "ユーザー名",
        max_length: 100,
        pii: true,
    }
}

/// メールアドレス（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式である
    /// - 最大 255 文字
    ///
    /// # エラー
    ///
    /// バリデーションに失敗した場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        // 基本的な構造検証: local@domain の形式であること
        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.chars().count() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザーエンティティ
///
/// システムのユーザーを表現する。認証情報（トークン等）は外部の
/// アイデンティティプロバイダが管理し、このエンティティは保持しない。
///
/// # 不変条件
///
/// - `email` はシステム内で一意
/// - 作成後、行は削除されるまで ID で参照可能
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:         UserId,
    name:       UserName,
    email:      Email,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// 新しいユーザーを作成する
    ///
    /// # 引数
    ///
    /// - `id`: ユーザー ID
    /// - `name`: 表示名
    /// - `email`: メールアドレス
    /// - `now`: 現在日時（呼び出し元から注入）
    pub fn new(id: UserId, name: UserName, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// 既存のデータからユーザーを復元する（データベースから取得時）
    pub fn from_db(
        id: UserId,
        name: UserName,
        email: Email,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
            updated_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ビジネスロジックメソッド

    /// ユーザー名を変更した新しいインスタンスを返す
    pub fn with_name(self, name: UserName, now: DateTime<Utc>) -> Self {
        Self {
            name,
            updated_at: now,
            ..self
        }
    }

    /// メールアドレスを変更した新しいインスタンスを返す
    pub fn with_email(self, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            email,
            updated_at: now,
            ..self
        }
    }
}

/// 口座
///
/// ユーザーが所有する口座行。詳細表示時にまとめて取得される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id:    AccountId,
    pub label: String,
}

/// プロジェクト
///
/// ユーザーが参加するプロジェクト行。詳細表示時にまとめて取得される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id:   ProjectId,
    pub name: String,
}

/// 支給
///
/// ユーザーへの支給記録。金額はセント単位の整数で保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub id:           PayoutId,
    pub amount_cents: i64,
    pub paid_at:      DateTime<Utc>,
}

/// ユーザーの関連コレクション一式
///
/// 詳細表示（Show）で一括取得される。各コレクションはエンティティストアが
/// 独立に所有し、リレーション名で取得される。
#[derive(Debug, Clone, Default)]
pub struct UserRelations {
    pub roles:    Vec<Role>,
    pub accounts: Vec<Account>,
    pub projects: Vec<Project>,
    pub payouts:  Vec<Payout>,
}
