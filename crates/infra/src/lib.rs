//! # CrewHub インフラ層
//!
//! データベースアクセスなど、外部システムとの連携を担当する。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続プールの作成とマイグレーション
//! - [`error`] - インフラ層で発生するエラーの定義
//! - [`repository`] - 永続化操作のトレイトと PostgreSQL 実装
//!
//! ## 設計方針
//!
//! - リポジトリはトレイトで抽象化し、ユースケース層・ハンドラ層からは
//!   `Arc<dyn XxxRepository>` として利用する
//! - SQL は実行時検証の `sqlx::query` / `query_as` API を使用する
//!   （ビルドにデータベース接続を要求しない）

pub mod db;
pub mod error;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
