//! # HTTP ミドルウェア
//!
//! 認証（プリンシパル解決）と認可（ケーパビリティ検証）のミドルウェアを提供する。

pub mod auth;

pub use auth::{AuthState, CapabilityState, CurrentUser, authenticate, require_capability};
