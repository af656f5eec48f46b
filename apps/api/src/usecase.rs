//! # ユースケース層
//!
//! API のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリと時計を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod user;

pub use user::{CreateUserInput, UpdateUserInput, UserUseCaseImpl};
