//! # リポジトリ
//!
//! 永続化操作のトレイト定義と PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - トレイトで抽象化し、ハンドラ・ユースケースのテストではスタブ実装を注入する
//! - 行構造体（`XxxRow`）が SQL 結果を受け取り、`TryFrom` でドメイン型へ変換する

pub mod notification_repository;
pub mod token_repository;
pub mod user_repository;

pub use notification_repository::{NotificationRepository, PostgresNotificationRepository};
pub use token_repository::{AccessTokenRepository, PostgresAccessTokenRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
