//! # CrewHub ドメイン層
//!
//! ビジネスロジックの中核を担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: User, Notification）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: Email, Capability）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! api → shared
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）には一切依存しない。
//! これにより、ビジネスロジックの純粋性が保たれる。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`user`] - ユーザーエンティティと関連コレクション
//! - [`role`] - ロールとケーパビリティ
//! - [`notification`] - ユーザー通知
//! - [`token`] - アクセストークン（読み取り専用）
//! - [`clock`] - 時刻プロバイダ
//!
//! ## 使用例
//!
//! ```rust
//! use crewhub_domain::{DomainError, user::UserId};
//!
//! // ユーザー ID の生成
//! let user_id = UserId::new();
//!
//! // ドメインエラーの生成
//! let error = DomainError::NotFound {
//!     entity_type: "User",
//!     id:          user_id.to_string(),
//! };
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod notification;
pub mod role;
pub mod token;
pub mod user;

pub use error::DomainError;
