use crate::app::errors::ErrorDisplay;
use crate::core::{Store, TokenStore};
use crate::domain::model::{Account, Flags, RawAccount, Team, TeamSubmission, VotingStatus};
use crate::domain::normalize::normalize_account;

/// Client-side view of the session, shared by every domain service.
#[derive(Debug, Default)]
pub struct SessionState {
    pub account: Store<Option<Account>>,
    pub team: Store<Option<Team>>,
    pub members: Store<Vec<Account>>,
    pub submission: Store<Option<TeamSubmission>>,
    pub flags: Store<Option<Flags>>,
    pub voting: Store<Option<VotingStatus>>,
    pub error: ErrorDisplay,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a token returned by the backend and adopts the account that came with it.
    pub fn apply_auth(&self, tokens: &dyn TokenStore, token: &str, account: RawAccount) -> Account {
        tokens.save_token(token);
        let account = normalize_account(account);
        tracing::debug!(account = %account.id, team = %account.team_id, "session refreshed");
        self.account.set(Some(account.clone()));
        account
    }

    pub fn set_team(&self, team: Option<Team>) {
        self.team.set(team);
    }

    pub fn clear_team(&self) {
        self.team.set(None);
        self.members.set(Vec::new());
    }

    /// Drops every cached value; used on logout.
    pub fn clear(&self) {
        self.account.set(None);
        self.clear_team();
        self.submission.set(None);
        self.flags.set(None);
        self.voting.set(None);
        self.error.clear();
    }
}
