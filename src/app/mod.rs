pub mod accounts;
pub mod errors;
pub mod flags;
pub mod state;
pub mod submissions;
pub mod teams;
pub mod voting;

use crate::adapters::{ApiClient, OpenHackApi};
use crate::core::{ApiError, ConfigProvider, TokenStore};
use crate::utils::error::Result;
use accounts::AccountService;
use flags::FlagsService;
use state::SessionState;
use std::sync::Arc;
use std::time::Duration;
use submissions::SubmissionService;
use teams::TeamService;
use tokio::sync::watch;
use voting::VotingService;

/// Entry point wiring one API client, the shared session state and the five domain
/// services, each with its own loading gate.
///
/// Construction spawns the smoothing tasks, so it must happen inside a tokio runtime.
#[derive(Debug)]
pub struct OpenHack {
    api: Arc<OpenHackApi>,
    state: Arc<SessionState>,
    accounts: AccountService,
    teams: TeamService,
    submissions: SubmissionService,
    flags: Arc<FlagsService>,
    voting: VotingService,
}

impl OpenHack {
    pub fn new(api: OpenHackApi, min_loading: Duration, poll_interval: Duration) -> Self {
        let api = Arc::new(api);
        let state = Arc::new(SessionState::new());

        Self {
            accounts: AccountService::new(api.clone(), state.clone(), min_loading),
            teams: TeamService::new(api.clone(), state.clone(), min_loading),
            submissions: SubmissionService::new(api.clone(), state.clone(), min_loading),
            flags: Arc::new(FlagsService::new(
                api.clone(),
                state.clone(),
                min_loading,
                poll_interval,
            )),
            voting: VotingService::new(api.clone(), state.clone(), min_loading),
            api,
            state,
        }
    }

    pub fn from_config(config: &dyn ConfigProvider, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = ApiClient::from_config(config, tokens)?;
        tracing::debug!("Using API at {}", http.base_url());
        Ok(Self::new(
            OpenHackApi::new(http),
            config.min_loading_duration(),
            config.flags_poll_interval(),
        ))
    }

    pub fn api(&self) -> &OpenHackApi {
        &self.api
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn teams(&self) -> &TeamService {
        &self.teams
    }

    pub fn submissions(&self) -> &SubmissionService {
        &self.submissions
    }

    pub fn flags(&self) -> &Arc<FlagsService> {
        &self.flags
    }

    pub fn voting(&self) -> &VotingService {
        &self.voting
    }

    pub fn has_token(&self) -> bool {
        self.api.http().tokens().get_token().is_some()
    }

    pub async fn ping(&self) -> std::result::Result<String, ApiError> {
        self.api.general().ping().await
    }

    /// Drops the token and every cached value, and stops flag polling.
    pub fn logout(&self) {
        self.accounts.forget();
        self.state.clear();
        self.flags.stop_polling();
        tracing::info!("Logged out");
    }

    // Smoothed loading flags, one per domain.

    pub fn account_loading(&self) -> watch::Receiver<bool> {
        self.accounts.loading().subscribe()
    }

    pub fn team_loading(&self) -> watch::Receiver<bool> {
        self.teams.loading().subscribe()
    }

    pub fn flags_loading(&self) -> watch::Receiver<bool> {
        self.flags.loading().subscribe()
    }

    pub fn submission_loading(&self) -> watch::Receiver<bool> {
        self.submissions.loading().subscribe()
    }

    pub fn voting_loading(&self) -> watch::Receiver<bool> {
        self.voting.loading().subscribe()
    }
}
