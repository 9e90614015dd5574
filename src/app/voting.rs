use crate::adapters::OpenHackApi;
use crate::app::state::SessionState;
use crate::core::{ApiError, Loading};
use crate::domain::model::{Team, VotingFinalists, VotingStatus};
use std::sync::Arc;
use std::time::Duration;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
pub struct VotingService {
    api: Arc<OpenHackApi>,
    state: Arc<SessionState>,
    loading: Loading,
}

impl VotingService {
    pub fn new(api: Arc<OpenHackApi>, state: Arc<SessionState>, min_loading: Duration) -> Self {
        Self {
            api,
            state,
            loading: Loading::new("voting", min_loading),
        }
    }

    pub fn loading(&self) -> &Loading {
        &self.loading
    }

    pub fn current(&self) -> Option<VotingStatus> {
        self.state.voting.get()
    }

    pub async fn fetch_voting_data(&self) -> ApiResult<VotingStatus> {
        self.loading
            .run(async {
                let status = self.api.voting().status().await?;
                self.state.voting.set(Some(status.clone()));
                Ok::<_, ApiError>(status)
            })
            .await
    }

    /// Finalists straight from the backend, without touching the cached status.
    pub async fn fetch_finalists(&self) -> ApiResult<VotingFinalists> {
        self.loading.run(self.api.voting().finalists()).await
    }

    /// Casts the vote, then re-reads the status so `has_voted` reflects it.
    pub async fn cast_vote(&self, team_id: &str) -> ApiResult<VotingStatus> {
        self.loading
            .run(async {
                let receipt = self.api.voting().cast(team_id).await?;
                tracing::info!("Vote cast for {}: {}", team_id, receipt.message);
                let status = self.api.voting().status().await?;
                self.state.voting.set(Some(status.clone()));
                Ok::<_, ApiError>(status)
            })
            .await
    }

    // Cached reads; all of them default to "nothing" until the status was fetched.

    pub fn finalists(&self) -> Vec<Team> {
        self.state
            .voting
            .with(|status| status.as_ref().map(|s| s.finalists.clone()).unwrap_or_default())
    }

    pub fn has_user_voted(&self) -> bool {
        self.state
            .voting
            .with(|status| status.as_ref().is_some_and(|s| s.has_voted))
    }

    pub fn is_voting_open(&self) -> bool {
        self.state
            .voting
            .with(|status| status.as_ref().is_some_and(|s| s.voting_open))
    }
}
