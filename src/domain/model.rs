use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumables {
    #[serde(default)]
    pub coffee: bool,
    #[serde(default)]
    pub jerky: bool,
    #[serde(default)]
    pub pizza: bool,
    #[serde(default)]
    pub sandwiches: u32,
    #[serde(default)]
    pub water: u32,
}

/// Account as the backend sends it. Name fields come in either as `firstName`/`lastName`
/// or as a single `name`, depending on the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccount {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "teamID", default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub checked_in: Option<bool>,
    #[serde(default)]
    pub consumables: Option<Consumables>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub food_restrictions: Option<String>,
    #[serde(default)]
    pub medical_conditions: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub present: Option<bool>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub has_voted: Option<bool>,
}

/// Normalized account held by the account store. See
/// [`normalize_account`](crate::domain::normalize::normalize_account).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    /// Empty when the account is not on a team.
    #[serde(rename = "teamID")]
    pub team_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumables: Option<Consumables>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_restrictions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_voted: Option<bool>,
}

impl Account {
    pub fn has_team(&self) -> bool {
        !self.team_id.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub pres: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    /// Account ids of the members.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub submission: Option<TeamSubmission>,
    #[serde(default)]
    pub table: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPreview {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub turnoff: Vec<String>,
    #[serde(default)]
    pub turnon: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub flags: HashMap<String, bool>,
    pub stage: Stage,
}

impl Flags {
    /// Unknown flags read as disabled.
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingStatus {
    #[serde(default)]
    pub finalists: Vec<Team>,
    #[serde(default)]
    pub has_voted: bool,
    #[serde(default)]
    pub voting_open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingFinalists {
    #[serde(default)]
    pub finalists: Vec<Team>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCastRequest {
    #[serde(rename = "teamID")]
    pub team_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCastResponse {
    #[serde(default)]
    pub message: String,
}

// Request / response envelopes ---------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CredentialRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCheckResponse {
    pub registered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTokenResponse {
    pub token: String,
    pub account: RawAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMembersResponse {
    pub token: String,
    pub account: RawAccount,
    #[serde(default)]
    pub members: Vec<RawAccount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembersResponse {
    #[serde(default)]
    pub members: Vec<RawAccount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_wire_names() {
        let raw: RawAccount = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "email": "ana@openhack.ro",
            "teamID": "t1",
            "firstName": "Ana",
            "checkedIn": true,
            "consumables": { "coffee": true, "sandwiches": 2 }
        }))
        .unwrap();

        assert_eq!(raw.team_id.as_deref(), Some("t1"));
        assert_eq!(raw.first_name.as_deref(), Some("Ana"));
        assert_eq!(raw.checked_in, Some(true));
        assert_eq!(raw.consumables.unwrap().sandwiches, 2);
    }

    #[test]
    fn test_team_tolerates_missing_fields() {
        let team: Team =
            serde_json::from_value(serde_json::json!({ "id": "t1", "name": "Rocket" })).unwrap();
        assert!(team.members.is_empty());
        assert!(team.submission.is_none());
        assert!(!team.deleted);
    }

    #[test]
    fn test_flags_lookup() {
        let flags: Flags = serde_json::from_value(serde_json::json!({
            "flags": { "voting": true, "submissions": false },
            "stage": { "id": "s2", "name": "Hacking", "turnoff": [], "turnon": ["submissions"] }
        }))
        .unwrap();

        assert!(flags.is_enabled("voting"));
        assert!(!flags.is_enabled("submissions"));
        assert!(!flags.is_enabled("unknown"));
        assert_eq!(flags.stage.turnon, vec!["submissions"]);
    }

    #[test]
    fn test_vote_request_serializes_team_id() {
        let body = serde_json::to_value(VoteCastRequest {
            team_id: "t9".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "teamID": "t9" }));
    }
}
