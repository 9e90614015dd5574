//! Typed endpoint groups on top of [`ApiClient`].

use crate::adapters::http::ApiClient;
use crate::domain::model::{
    AccountCheckResponse, AccountMembersResponse, AccountTokenResponse, CredentialRequest, Flags,
    RawAccount, Team, TeamMembersResponse, TeamPreview, VoteCastRequest, VoteCastResponse,
    VotingFinalists, VotingStatus,
};
use crate::utils::error::ApiError;
use serde_json::json;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct OpenHackApi {
    http: ApiClient,
}

impl OpenHackApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &ApiClient {
        &self.http
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts { http: &self.http }
    }

    pub fn teams(&self) -> Teams<'_> {
        Teams { http: &self.http }
    }

    pub fn submissions(&self) -> Submissions<'_> {
        Submissions { http: &self.http }
    }

    pub fn flags(&self) -> FlagsApi<'_> {
        FlagsApi { http: &self.http }
    }

    pub fn general(&self) -> General<'_> {
        General { http: &self.http }
    }

    pub fn voting(&self) -> Voting<'_> {
        Voting { http: &self.http }
    }
}

pub struct Accounts<'a> {
    http: &'a ApiClient,
}

impl Accounts<'_> {
    /// Whether `email` already has an account.
    pub async fn check(&self, email: &str) -> ApiResult<AccountCheckResponse> {
        self.http
            .post("/accounts/auth/check", &json!({ "email": email }))
            .await
    }

    pub async fn register(&self, email: &str, password: &str) -> ApiResult<AccountTokenResponse> {
        self.http
            .post("/accounts/auth/register", &CredentialRequest { email, password })
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AccountTokenResponse> {
        self.http
            .post("/accounts/auth/login", &CredentialRequest { email, password })
            .await
    }

    pub async fn whoami(&self) -> ApiResult<RawAccount> {
        self.http.get("/accounts/meta/whoami", &[]).await
    }

    /// Renames the caller; the backend answers with a fresh token.
    pub async fn edit_name(&self, name: &str) -> ApiResult<AccountTokenResponse> {
        self.http.patch("/accounts/me", &json!({ "name": name })).await
    }
}

pub struct Teams<'a> {
    http: &'a ApiClient,
}

impl Teams<'_> {
    /// The caller's own team; requires membership.
    pub async fn detail(&self) -> ApiResult<Team> {
        self.http.get("/teams", &[]).await
    }

    pub async fn preview(&self, team_id: &str) -> ApiResult<TeamPreview> {
        self.http.get("/teams/meta/preview", &[("id", team_id)]).await
    }

    pub async fn create(&self, name: &str) -> ApiResult<AccountTokenResponse> {
        self.http.post("/teams", &json!({ "name": name })).await
    }

    pub async fn change_name(&self, name: &str) -> ApiResult<Team> {
        self.http.patch("/teams/name", &json!({ "name": name })).await
    }

    pub async fn change_table(&self, table: &str) -> ApiResult<Team> {
        self.http.patch("/teams/table", &json!({ "table": table })).await
    }

    /// Deletes the team (only allowed for a single-member team).
    pub async fn remove(&self) -> ApiResult<AccountTokenResponse> {
        self.http.delete("/teams").await
    }

    pub async fn members(&self) -> ApiResult<Vec<RawAccount>> {
        self.http.get("/teams/members", &[]).await
    }

    pub async fn join(&self, team_id: &str) -> ApiResult<AccountMembersResponse> {
        self.http
            .patch_query("/teams/members/join", &[("id", team_id)])
            .await
    }

    pub async fn leave(&self) -> ApiResult<AccountMembersResponse> {
        self.http.patch_query("/teams/members/leave", &[]).await
    }

    pub async fn kick(&self, account_id: &str) -> ApiResult<TeamMembersResponse> {
        self.http
            .patch_query("/teams/members/kick", &[("id", account_id)])
            .await
    }
}

/// Submission fields that can be patched one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionField {
    Name,
    Desc,
    Repo,
    Pres,
}

impl SubmissionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionField::Name => "name",
            SubmissionField::Desc => "desc",
            SubmissionField::Repo => "repo",
            SubmissionField::Pres => "pres",
        }
    }
}

pub struct Submissions<'a> {
    http: &'a ApiClient,
}

impl Submissions<'_> {
    pub async fn update(&self, field: SubmissionField, value: &str) -> ApiResult<Team> {
        let key = field.as_str();
        let path = format!("/teams/submissions/{}", key);
        self.http.patch(&path, &json!({ key: value })).await
    }
}

pub struct FlagsApi<'a> {
    http: &'a ApiClient,
}

impl FlagsApi<'_> {
    pub async fn fetch(&self) -> ApiResult<Flags> {
        self.http.get("/accounts/flags", &[]).await
    }
}

pub struct General<'a> {
    http: &'a ApiClient,
}

impl General<'_> {
    pub async fn ping(&self) -> ApiResult<String> {
        self.http.get_text("/meta/ping").await
    }
}

pub struct Voting<'a> {
    http: &'a ApiClient,
}

impl Voting<'_> {
    pub async fn finalists(&self) -> ApiResult<VotingFinalists> {
        self.http.get("/accounts/voting/finalists", &[]).await
    }

    pub async fn status(&self) -> ApiResult<VotingStatus> {
        self.http.get("/accounts/voting/status", &[]).await
    }

    pub async fn cast(&self, team_id: &str) -> ApiResult<VoteCastResponse> {
        self.http
            .post(
                "/accounts/voting/vote",
                &VoteCastRequest {
                    team_id: team_id.to_string(),
                },
            )
            .await
    }
}
