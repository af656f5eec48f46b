//! # アクセストークン
//!
//! 外部のアイデンティティプロバイダが発行するアクセストークンの
//! 読み取り専用モデル。
//!
//! ## 設計方針
//!
//! このサービスはトークンを発行・失効しない。有効性判定のために
//! トークンテーブルを参照するのみ。ID はプロバイダが発行する
//! 不透明な文字列（UUID とは限らない）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, user::UserId};

/// アクセストークン ID（値オブジェクト）
///
/// アイデンティティプロバイダが発行する不透明な文字列識別子。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
pub struct AccessTokenId(String);

impl AccessTokenId {
    /// トークン ID を作成する
    ///
    /// # エラー
    ///
    /// 空文字列の場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(DomainError::Validation(
                "トークン ID は必須です".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// アクセストークンエンティティ
///
/// アイデンティティプロバイダが認証時に作成する。このサービスは
/// 読み取りのみを行い、一切変更しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    id:         AccessTokenId,
    user_id:    UserId,
    revoked:    bool,
    created_at: DateTime<Utc>,
}

impl AccessToken {
    /// 既存のデータからトークンを復元する（データベースから取得時）
    pub fn from_db(
        id: AccessTokenId,
        user_id: UserId,
        revoked: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            revoked,
            created_at,
        }
    }

    pub fn id(&self) -> &AccessTokenId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn revoked(&self) -> bool {
        self.revoked
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// トークンが有効か判定する（失効していないこと）
    pub fn is_valid(&self) -> bool {
        !self.revoked
    }
}
