//! # 時刻プロバイダ
//!
//! `created_at` / `updated_at` / `read_at` の採時を一箇所に集約する。
//! ユースケースは `Utc::now()` を直接呼ばず、このトレイト経由で
//! 現在時刻を取得する。テストでは固定時刻を差し込める。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// システム時刻をそのまま返す本番用実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 常に同じ時刻を返すテスト用実装
pub struct FixedClock {
   now: DateTime<Utc>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self { now }
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.now
   }
}
