//! # ロールとケーパビリティ
//!
//! ユーザーに割り当てられるロールと、ロールが保持する
//! ケーパビリティ（操作権限トークン）を定義する。
//!
//! ## 設計方針
//!
//! - **ポリシーの外部化**: ハンドラにロール名を埋め込まず、
//!   「プリンシパルがケーパビリティ X を保持するか」の判定に一本化する
//! - **文字列トークン**: ケーパビリティは `users:manage` のような
//!   `リソース:アクション` 形式の文字列

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

define_uuid_id! {
   /// ロール ID（一意識別子）
   pub struct RoleId;
}

/// ケーパビリティ（値オブジェクト）
///
/// `users:manage` のような `リソース:アクション` 形式の権限トークン。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability(String);

impl Capability {
   /// 新しいケーパビリティを作成する
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }

   /// このケーパビリティが、要求されたケーパビリティを満たすか判定する
   ///
   /// ## マッチングルール
   ///
   /// | 保持 | 要求 | 結果 |
   /// |------|------|------|
   /// | `*` | 任意 | true（全権限） |
   /// | `users:*` | `users:manage` | true（リソース内の全アクション） |
   /// | `users:manage` | `users:manage` | true（完全一致） |
   /// | `users:read` | `users:manage` | false |
   pub fn satisfies(&self, required: &Capability) -> bool {
      let held = self.as_str();
      let req = required.as_str();

      if held == "*" {
         return true;
      }

      if let Some(resource) = held.strip_suffix(":*") {
         return req.starts_with(&format!("{resource}:"));
      }

      held == req
   }
}

impl std::fmt::Display for Capability {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}", self.0)
   }
}

/// ロールエンティティ
///
/// ユーザーに割り当てられるケーパビリティの集合。
/// roles テーブルの `capabilities` カラム（JSONB 文字列配列）に対応する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
   id:           RoleId,
   name:         String,
   capabilities: Vec<Capability>,
   created_at:   DateTime<Utc>,
}

impl Role {
   /// 既存のデータからロールを復元する（データベースから取得時）
   pub fn from_db(
      id: RoleId,
      name: String,
      capabilities: Vec<Capability>,
      created_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         name,
         capabilities,
         created_at,
      }
   }

   pub fn id(&self) -> &RoleId {
      &self.id
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn capabilities(&self) -> &[Capability] {
      &self.capabilities
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   /// このロールが要求されたケーパビリティを満たすか判定する
   pub fn grants(&self, required: &Capability) -> bool {
      self.capabilities.iter().any(|c| c.satisfies(required))
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case("*", "users:manage")]
   #[case("*", "notifications:read")]
   fn test_全権限ワイルドカードは任意のケーパビリティを満たす(
      #[case] held: &str,
      #[case] required: &str,
   ) {
      let held = Capability::new(held);
      let required = Capability::new(required);
      assert!(held.satisfies(&required));
   }

   #[rstest]
   #[case("users:*", "users:manage", true)]
   #[case("users:*", "users:read", true)]
   #[case("users:*", "projects:read", false)]
   fn test_リソースワイルドカードはリソース内のみ満たす(
      #[case] held: &str,
      #[case] required: &str,
      #[case] expected: bool,
   ) {
      let held = Capability::new(held);
      let required = Capability::new(required);
      assert_eq!(held.satisfies(&required), expected);
   }

   #[rstest]
   #[case("users:manage", "users:manage", true)]
   #[case("users:read", "users:manage", false)]
   fn test_完全一致のみ満たす(
      #[case] held: &str,
      #[case] required: &str,
      #[case] expected: bool,
   ) {
      let held = Capability::new(held);
      let required = Capability::new(required);
      assert_eq!(held.satisfies(&required), expected);
   }

   #[rstest]
   fn test_ロールはいずれかのケーパビリティが満たせばgrantsを返す() {
      let role = Role::from_db(
         RoleId::new(),
         "hr".to_string(),
         vec![
            Capability::new("payouts:read"),
            Capability::new("users:manage"),
         ],
         chrono::Utc::now(),
      );

      assert!(role.grants(&Capability::new("users:manage")));
      assert!(!role.grants(&Capability::new("projects:manage")));
   }
}
