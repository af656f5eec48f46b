//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケースに委譲

pub mod health;
pub mod notification;
pub mod token;
pub mod user;

pub use health::{ReadinessState, health_check, readiness_check};
pub use notification::{NotificationState, get_notifications, read_notification};
pub use token::{TokenState, check_token};
pub use user::{
    UserState,
    create_user,
    delete_user,
    get_user,
    list_users,
    update_user,
    validate_user,
};
