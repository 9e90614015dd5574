use crate::adapters::{OpenHackApi, SubmissionField};
use crate::app::state::SessionState;
use crate::core::{ApiError, Loading};
use crate::domain::model::{Team, TeamSubmission};
use std::sync::Arc;
use std::time::Duration;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Per-field submission edits. Each call is one request; debouncing keystrokes is the
/// caller's job.
#[derive(Debug)]
pub struct SubmissionService {
    api: Arc<OpenHackApi>,
    state: Arc<SessionState>,
    loading: Loading,
}

impl SubmissionService {
    pub fn new(api: Arc<OpenHackApi>, state: Arc<SessionState>, min_loading: Duration) -> Self {
        Self {
            api,
            state,
            loading: Loading::new("submission", min_loading),
        }
    }

    pub fn loading(&self) -> &Loading {
        &self.loading
    }

    pub fn current(&self) -> Option<TeamSubmission> {
        self.state.submission.get()
    }

    pub async fn update_name(&self, name: &str) -> ApiResult<Team> {
        self.update(SubmissionField::Name, name).await
    }

    pub async fn update_desc(&self, desc: &str) -> ApiResult<Team> {
        self.update(SubmissionField::Desc, desc).await
    }

    pub async fn update_repo(&self, repo: &str) -> ApiResult<Team> {
        self.update(SubmissionField::Repo, repo).await
    }

    pub async fn update_pres(&self, pres: &str) -> ApiResult<Team> {
        self.update(SubmissionField::Pres, pres).await
    }

    pub async fn update(&self, field: SubmissionField, value: &str) -> ApiResult<Team> {
        self.loading
            .run(async {
                let team = self.api.submissions().update(field, value).await?;
                tracing::debug!(field = field.as_str(), team = %team.id, "submission updated");
                self.state.submission.set(team.submission.clone());
                self.state.set_team(Some(team.clone()));
                Ok::<_, ApiError>(team)
            })
            .await
    }
}
