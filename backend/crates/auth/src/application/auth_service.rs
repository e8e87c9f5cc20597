//! Auth Service
//!
//! Registration, login (token issuance + login history) and user listing.

use std::sync::Arc;

use platform::client::ClientInfo;
use platform::password::verify_dummy;

use crate::application::config::AuthConfig;
use crate::domain::entity::{login_history::LoginHistory, user::User};
use crate::domain::repository::{AuthStore, LoginHistoryRepository, UserRepository};
use crate::domain::token::{IssuedToken, TokenIssuer};
use crate::domain::value_object::{RawPassword, UserId, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Longest submitted user name kept in the login history
const MAX_RECORDED_USER_NAME: usize = 255;

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: UserId,
    pub user_name: String,
}

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user_id: UserId,
    pub user_name: String,
    pub token: IssuedToken,
}

/// Auth service
pub struct AuthService<U, H>
where
    U: UserRepository,
    H: LoginHistoryRepository,
{
    user_repo: Arc<U>,
    login_history_repo: Arc<H>,
    token_issuer: Arc<dyn TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<S: AuthStore> AuthService<S, S> {
    /// Service backed by a single store
    pub fn from_store(
        store: Arc<S>,
        token_issuer: Arc<dyn TokenIssuer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self::new(store.clone(), store, token_issuer, config)
    }
}

impl<U, H> AuthService<U, H>
where
    U: UserRepository,
    H: LoginHistoryRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        login_history_repo: Arc<H>,
        token_issuer: Arc<dyn TokenIssuer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            login_history_repo,
            token_issuer,
            config,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let user_name = UserName::new(&input.user_name)?;
        let raw_password = RawPassword::new(input.password)?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new(user_name, password_hash);

        // a concurrent registration still loses on the unique index
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.user_id,
            user_name: user.user_name.original().to_string(),
        })
    }

    /// Every attempt is recorded in the login history, whatever the outcome.
    pub async fn login(&self, input: LoginInput, client: ClientInfo) -> AuthResult<LoginOutput> {
        let submitted: String = input
            .user_name
            .trim()
            .chars()
            .take(MAX_RECORDED_USER_NAME)
            .collect();
        let raw_password = RawPassword::for_login(input.password);

        // a name that can't be valid can't have an account either
        let user = match UserName::new(&submitted) {
            Ok(user_name) => self.user_repo.find_by_user_name(&user_name).await?,
            Err(_) => None,
        };

        let verified = match &user {
            Some(user) => user
                .password_hash
                .verify(&raw_password, self.config.pepper()),
            None => {
                verify_dummy(raw_password.inner(), self.config.pepper());
                false
            }
        };

        let user = match user {
            Some(user) if verified => user,
            other => {
                self.record_attempt(other.map(|u| u.user_id), &submitted, false, &client)
                    .await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = match self.token_issuer.issue(&user) {
            Ok(token) => token,
            Err(e) => {
                self.record_attempt(Some(user.user_id), &submitted, false, &client)
                    .await?;
                return Err(e);
            }
        };

        self.record_attempt(Some(user.user_id), &submitted, true, &client)
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            client_ip = ?client.ip,
            "User logged in"
        );

        Ok(LoginOutput {
            user_id: user.user_id,
            user_name: user.user_name.original().to_string(),
            token,
        })
    }

    pub async fn list_users(&self) -> AuthResult<Vec<User>> {
        self.user_repo.find_all().await
    }

    /// Login attempts attributed to `user_id`, newest first
    pub async fn login_history(&self, user_id: &UserId) -> AuthResult<Vec<LoginHistory>> {
        self.login_history_repo.find_by_user_id(user_id).await
    }

    async fn record_attempt(
        &self,
        user_id: Option<UserId>,
        user_name: &str,
        succeeded: bool,
        client: &ClientInfo,
    ) -> AuthResult<()> {
        let entry = LoginHistory::new(
            user_id,
            user_name,
            succeeded,
            client.ip_string(),
            client.user_agent.clone(),
        );
        self.login_history_repo.create(&entry).await
    }
}
