use crate::adapters::OpenHackApi;
use crate::app::state::SessionState;
use crate::core::{ApiError, Loading};
use crate::domain::model::{
    Account, AccountMembersResponse, AccountTokenResponse, Team, TeamPreview,
};
use crate::domain::normalize::normalize_accounts;
use std::sync::Arc;
use std::time::Duration;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Team membership and team document.
///
/// Composite actions (`create_team`, `join`, `kick`) call `get_team`/`load_members` from
/// inside their own loading scope; those nested calls share the gate and finish without
/// extra delay.
#[derive(Debug)]
pub struct TeamService {
    api: Arc<OpenHackApi>,
    state: Arc<SessionState>,
    loading: Loading,
}

impl TeamService {
    pub fn new(api: Arc<OpenHackApi>, state: Arc<SessionState>, min_loading: Duration) -> Self {
        Self {
            api,
            state,
            loading: Loading::new("team", min_loading),
        }
    }

    pub fn loading(&self) -> &Loading {
        &self.loading
    }

    pub fn current(&self) -> Option<Team> {
        self.state.team.get()
    }

    pub fn members(&self) -> Vec<Account> {
        self.state.members.get()
    }

    pub async fn get_team(&self) -> ApiResult<Team> {
        self.loading
            .run(async {
                let team = self.api.teams().detail().await?;
                self.state.set_team(Some(team.clone()));
                Ok::<_, ApiError>(team)
            })
            .await
    }

    pub async fn load_members(&self) -> ApiResult<Vec<Account>> {
        self.loading
            .run(async {
                let members = normalize_accounts(Some(self.api.teams().members().await?));
                self.state.members.set(members.clone());
                Ok::<_, ApiError>(members)
            })
            .await
    }

    /// Looks up another team without joining it.
    pub async fn preview(&self, team_id: &str) -> ApiResult<TeamPreview> {
        self.loading.run(self.api.teams().preview(team_id)).await
    }

    pub async fn create_team(&self, name: &str) -> ApiResult<Team> {
        self.loading
            .run(async {
                let response = self.api.teams().create(name).await?;
                self.refresh_auth(&response);
                let team = self.get_team().await?;
                self.load_members().await?;
                tracing::info!("Created team {} ({})", team.name, team.id);
                Ok::<_, ApiError>(team)
            })
            .await
    }

    pub async fn change_team_name(&self, name: &str) -> ApiResult<Team> {
        self.loading
            .run(async {
                let team = self.api.teams().change_name(name).await?;
                self.state.set_team(Some(team.clone()));
                Ok::<_, ApiError>(team)
            })
            .await
    }

    pub async fn change_table(&self, table: &str) -> ApiResult<Team> {
        self.loading
            .run(async {
                let team = self.api.teams().change_table(table).await?;
                self.state.set_team(Some(team.clone()));
                Ok::<_, ApiError>(team)
            })
            .await
    }

    pub async fn delete_team(&self) -> ApiResult<Account> {
        self.loading
            .run(async {
                let response = self.api.teams().remove().await?;
                let account = self.refresh_auth(&response);
                self.state.clear_team();
                Ok::<_, ApiError>(account)
            })
            .await
    }

    pub async fn join(&self, team_id: &str) -> ApiResult<Team> {
        self.loading
            .run(async {
                let response = self.api.teams().join(team_id).await?;
                self.refresh_auth_with_members(response);
                self.get_team().await
            })
            .await
    }

    pub async fn leave(&self) -> ApiResult<Account> {
        self.loading
            .run(async {
                let response = self.api.teams().leave().await?;
                let account = self.state.apply_auth(
                    self.api.http().tokens().as_ref(),
                    &response.token,
                    response.account,
                );
                self.state.clear_team();
                Ok::<_, ApiError>(account)
            })
            .await
    }

    pub async fn kick(&self, account_id: &str) -> ApiResult<Team> {
        self.loading
            .run(async {
                let response = self.api.teams().kick(account_id).await?;
                self.state
                    .members
                    .set(normalize_accounts(Some(response.members)));
                self.get_team().await
            })
            .await
    }

    fn refresh_auth(&self, response: &AccountTokenResponse) -> Account {
        self.state.apply_auth(
            self.api.http().tokens().as_ref(),
            &response.token,
            response.account.clone(),
        )
    }

    fn refresh_auth_with_members(&self, response: AccountMembersResponse) {
        self.state.apply_auth(
            self.api.http().tokens().as_ref(),
            &response.token,
            response.account,
        );
        self.state
            .members
            .set(normalize_accounts(Some(response.members)));
    }
}
