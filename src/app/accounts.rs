use crate::adapters::OpenHackApi;
use crate::app::state::SessionState;
use crate::core::{ApiError, Loading};
use crate::domain::model::{Account, AccountCheckResponse, RawAccount};
use crate::domain::normalize::normalize_account;
use std::sync::Arc;
use std::time::Duration;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
pub struct AccountService {
    api: Arc<OpenHackApi>,
    state: Arc<SessionState>,
    loading: Loading,
}

impl AccountService {
    pub fn new(api: Arc<OpenHackApi>, state: Arc<SessionState>, min_loading: Duration) -> Self {
        Self {
            api,
            state,
            loading: Loading::new("account", min_loading),
        }
    }

    pub fn loading(&self) -> &Loading {
        &self.loading
    }

    pub fn current(&self) -> Option<Account> {
        self.state.account.get()
    }

    /// Whether `email` is registered. Leaves the session untouched.
    pub async fn check(&self, email: &str) -> ApiResult<AccountCheckResponse> {
        self.loading.run(self.api.accounts().check(email)).await
    }

    pub async fn register(&self, email: &str, password: &str) -> ApiResult<Account> {
        self.loading
            .run(async {
                let response = self.api.accounts().register(email, password).await?;
                tracing::info!("Registered {}", email);
                Ok::<_, ApiError>(self.adopt(&response.token, response.account))
            })
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Account> {
        self.loading
            .run(async {
                let response = self.api.accounts().login(email, password).await?;
                tracing::info!("Logged in as {}", email);
                Ok::<_, ApiError>(self.adopt(&response.token, response.account))
            })
            .await
    }

    pub async fn whoami(&self) -> ApiResult<Account> {
        self.loading
            .run(async {
                let account = normalize_account(self.api.accounts().whoami().await?);
                self.state.account.set(Some(account.clone()));
                Ok::<_, ApiError>(account)
            })
            .await
    }

    pub async fn edit_name(&self, name: &str) -> ApiResult<Account> {
        self.loading
            .run(async {
                let response = self.api.accounts().edit_name(name).await?;
                Ok::<_, ApiError>(self.adopt(&response.token, response.account))
            })
            .await
    }

    /// Forgets the token and the cached account. Team, flags and voting caches are
    /// cleared by [`OpenHack::logout`](crate::app::OpenHack::logout).
    pub fn forget(&self) {
        self.api.http().tokens().remove_token();
        self.state.account.set(None);
    }

    fn adopt(&self, token: &str, account: RawAccount) -> Account {
        self.state
            .apply_auth(self.api.http().tokens().as_ref(), token, account)
    }
}
