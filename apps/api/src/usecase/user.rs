//! ユーザー管理ユースケース

use std::sync::Arc;

use crewhub_domain::{
    clock::Clock,
    user::{Email, User, UserId, UserName},
};
use crewhub_infra::repository::UserRepository;

use crate::error::ApiError;

/// ユーザー作成の入力
pub struct CreateUserInput {
    pub name:  UserName,
    pub email: Email,
}

/// ユーザー更新の入力
pub struct UpdateUserInput {
    pub user_id: UserId,
    pub name:    Option<UserName>,
    pub email:   Option<Email>,
}

/// ユーザー管理ユースケース
pub struct UserUseCaseImpl {
    user_repository: Arc<dyn UserRepository>,
    clock:           Arc<dyn Clock>,
}

impl UserUseCaseImpl {
    pub fn new(user_repository: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repository,
            clock,
        }
    }

    /// ユーザーを作成する
    ///
    /// 1. メールアドレスの重複チェック
    /// 2. User ドメインオブジェクト作成
    /// 3. users テーブルに挿入
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, ApiError> {
        // メールアドレスの重複チェック
        if let Some(_existing) = self.user_repository.find_by_email(&input.email).await? {
            return Err(ApiError::Conflict(
                "このメールアドレスは既に使用されています".to_string(),
            ));
        }

        let now = self.clock.now();
        let user = User::new(UserId::new(), input.name, input.email, now);

        self.user_repository.insert(&user).await?;

        Ok(user)
    }

    /// ユーザー情報を更新する（名前、メールアドレス）
    ///
    /// 入力で指定されたフィールドだけを更新する。
    /// メールアドレスは他ユーザーとの重複を拒否する。
    pub async fn update_user(&self, input: UpdateUserInput) -> Result<User, ApiError> {
        let user = self
            .user_repository
            .find_by_id(&input.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let now = self.clock.now();

        let user = if let Some(name) = input.name {
            user.with_name(name, now)
        } else {
            user
        };

        let user = if let Some(email) = input.email {
            // 他のユーザーが同じメールアドレスを使っていないか確認
            if let Some(existing) = self.user_repository.find_by_email(&email).await? {
                if existing.id() != user.id() {
                    return Err(ApiError::Conflict(
                        "このメールアドレスは既に使用されています".to_string(),
                    ));
                }
            }
            user.with_email(email, now)
        } else {
            user
        };

        self.user_repository.update(&user).await?;

        Ok(user)
    }

    /// ユーザーを削除する
    ///
    /// 関連データ（ロール割り当て、アカウント、プロジェクト、支払い、通知）は
    /// 外部キーのカスケードで削除される。
    pub async fn delete_user(&self, user_id: &UserId) -> Result<(), ApiError> {
        let deleted = self.user_repository.delete(user_id).await?;

        if deleted == 0 {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use crewhub_domain::{
        clock::FixedClock,
        role::Role,
        user::UserRelations,
    };
    use crewhub_infra::InfraError;
    use pretty_assertions::assert_eq;

    use super::*;

    /// インメモリのスタブリポジトリ
    struct StubUserRepository {
        users:         Mutex<Vec<User>>,
        deleted_rows:  u64,
    }

    impl StubUserRepository {
        fn new(users: Vec<User>) -> Self {
            Self {
                users:        Mutex::new(users),
                deleted_rows: 1,
            }
        }

        fn with_deleted_rows(users: Vec<User>, deleted_rows: u64) -> Self {
            Self {
                users: Mutex::new(users),
                deleted_rows,
            }
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn find_all_with_roles(&self) -> Result<Vec<(User, Vec<Role>)>, InfraError> {
            todo!()
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id() == id)
                .cloned())
        }

        async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email() == email)
                .cloned())
        }

        async fn find_with_roles(
            &self,
            _id: &UserId,
        ) -> Result<Option<(User, Vec<Role>)>, InfraError> {
            todo!()
        }

        async fn find_detail(
            &self,
            _id: &UserId,
        ) -> Result<Option<(User, UserRelations)>, InfraError> {
            todo!()
        }

        async fn insert(&self, user: &User) -> Result<(), InfraError> {
            self.users.lock().unwrap().push(user.clone());
            Ok(())
        }

        async fn update(&self, user: &User) -> Result<(), InfraError> {
            let mut users = self.users.lock().unwrap();
            if let Some(slot) = users.iter_mut().find(|u| u.id() == user.id()) {
                *slot = user.clone();
            }
            Ok(())
        }

        async fn delete(&self, id: &UserId) -> Result<u64, InfraError> {
            let mut users = self.users.lock().unwrap();
            users.retain(|u| u.id() != id);
            Ok(self.deleted_rows)
        }
    }

    fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap(),
        ))
    }

    fn existing_user() -> User {
        User::new(
            UserId::new(),
            UserName::new("Alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_user_ユーザーを作成できる() {
        let repo = Arc::new(StubUserRepository::new(vec![]));
        let sut = UserUseCaseImpl::new(repo.clone(), fixed_clock());

        let result = sut
            .create_user(CreateUserInput {
                name:  UserName::new("Bob").unwrap(),
                email: Email::new("bob@example.com").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(result.name().as_str(), "Bob");
        assert_eq!(repo.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_user_メールアドレス重複はconflict() {
        let repo = Arc::new(StubUserRepository::new(vec![existing_user()]));
        let sut = UserUseCaseImpl::new(repo, fixed_clock());

        let result = sut
            .create_user(CreateUserInput {
                name:  UserName::new("Bob").unwrap(),
                email: Email::new("alice@example.com").unwrap(),
            })
            .await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_user_名前のみ更新できる() {
        let user = existing_user();
        let user_id = user.id().clone();
        let repo = Arc::new(StubUserRepository::new(vec![user]));
        let sut = UserUseCaseImpl::new(repo, fixed_clock());

        let result = sut
            .update_user(UpdateUserInput {
                user_id,
                name: Some(UserName::new("Alice Renamed").unwrap()),
                email: None,
            })
            .await
            .unwrap();

        assert_eq!(result.name().as_str(), "Alice Renamed");
        assert_eq!(result.email().as_str(), "alice@example.com");
    }

    #[tokio::test]
    async fn test_update_user_自分自身のメールアドレスはそのまま更新できる() {
        let user = existing_user();
        let user_id = user.id().clone();
        let repo = Arc::new(StubUserRepository::new(vec![user]));
        let sut = UserUseCaseImpl::new(repo, fixed_clock());

        let result = sut
            .update_user(UpdateUserInput {
                user_id,
                name: None,
                email: Some(Email::new("alice@example.com").unwrap()),
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_user_他ユーザーのメールアドレスはconflict() {
        let alice = existing_user();
        let bob = User::new(
            UserId::new(),
            UserName::new("Bob").unwrap(),
            Email::new("bob@example.com").unwrap(),
            Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
        );
        let bob_id = bob.id().clone();
        let repo = Arc::new(StubUserRepository::new(vec![alice, bob]));
        let sut = UserUseCaseImpl::new(repo, fixed_clock());

        let result = sut
            .update_user(UpdateUserInput {
                user_id: bob_id,
                name:    None,
                email:   Some(Email::new("alice@example.com").unwrap()),
            })
            .await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_user_存在しないユーザーはnot_found() {
        let repo = Arc::new(StubUserRepository::new(vec![]));
        let sut = UserUseCaseImpl::new(repo, fixed_clock());

        let result = sut
            .update_user(UpdateUserInput {
                user_id: UserId::new(),
                name:    Some(UserName::new("Ghost").unwrap()),
                email:   None,
            })
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_削除できる() {
        let user = existing_user();
        let user_id = user.id().clone();
        let repo = Arc::new(StubUserRepository::new(vec![user]));
        let sut = UserUseCaseImpl::new(repo.clone(), fixed_clock());

        let result = sut.delete_user(&user_id).await;

        assert!(result.is_ok());
        assert!(repo.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_存在しないユーザーはnot_found() {
        let repo = Arc::new(StubUserRepository::with_deleted_rows(vec![], 0));
        let sut = UserUseCaseImpl::new(repo, fixed_clock());

        let result = sut.delete_user(&UserId::new()).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
