use crate::domain::model::{Account, RawAccount};

pub const DEFAULT_FIRST_NAME: &str = "Participant";

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Reduces the backend's account shapes to one: split `name` when first/last are
/// missing, fall back to [`DEFAULT_FIRST_NAME`], and default `teamID` to `""`.
pub fn normalize_account(input: RawAccount) -> Account {
    let raw_name = input
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let name_parts: Vec<&str> = raw_name.split_whitespace().collect();

    let mut first_name = trimmed(input.first_name)
        .unwrap_or_else(|| name_parts.first().copied().unwrap_or_default().to_string());
    let mut last_name = trimmed(input.last_name).unwrap_or_else(|| {
        name_parts
            .get(1..)
            .map(|rest| rest.join(" "))
            .unwrap_or_default()
    });
    last_name = last_name.trim().to_string();

    if first_name.is_empty() && last_name.is_empty() && !raw_name.is_empty() {
        first_name = raw_name.clone();
    }
    if first_name.is_empty() {
        first_name = DEFAULT_FIRST_NAME.to_string();
    }

    let display_name = if raw_name.is_empty() {
        [first_name.as_str(), last_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        raw_name
    };

    Account {
        id: input.id,
        email: input.email,
        team_id: input.team_id.unwrap_or_default(),
        first_name,
        last_name,
        name: (!display_name.is_empty()).then_some(display_name),
        checked_in: input.checked_in,
        consumables: input.consumables,
        dob: input.dob,
        food_restrictions: input.food_restrictions,
        medical_conditions: input.medical_conditions,
        phone_number: input.phone_number,
        present: input.present,
        university: input.university,
        has_voted: input.has_voted,
    }
}

pub fn normalize_accounts(accounts: Option<Vec<RawAccount>>) -> Vec<Account> {
    accounts
        .unwrap_or_default()
        .into_iter()
        .map(normalize_account)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: Option<&str>, first: Option<&str>, last: Option<&str>) -> RawAccount {
        RawAccount {
            id: "a1".to_string(),
            email: "ana@openhack.ro".to_string(),
            name: name.map(str::to_string),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_splits_full_name() {
        let account = normalize_account(raw(Some("  Ana Maria  Popescu "), None, None));
        assert_eq!(account.first_name, "Ana");
        assert_eq!(account.last_name, "Maria Popescu");
        assert_eq!(account.name.as_deref(), Some("Ana Maria  Popescu"));
        assert_eq!(account.team_id, "");
    }

    #[test]
    fn test_explicit_names_win() {
        let account = normalize_account(raw(Some("Nick Name"), Some(" Ana "), Some("Pop")));
        assert_eq!(account.first_name, "Ana");
        assert_eq!(account.last_name, "Pop");
        assert_eq!(account.name.as_deref(), Some("Nick Name"));
    }

    #[test]
    fn test_display_name_built_from_parts() {
        let account = normalize_account(raw(None, Some("Ana"), Some("Pop")));
        assert_eq!(account.name.as_deref(), Some("Ana Pop"));

        let account = normalize_account(raw(None, Some("Ana"), None));
        assert_eq!(account.name.as_deref(), Some("Ana"));
        assert_eq!(account.last_name, "");
    }

    #[test]
    fn test_blank_explicit_first_name_takes_raw_name() {
        let account = normalize_account(raw(Some("Ana"), Some("  "), Some("")));
        assert_eq!(account.first_name, "Ana");
        assert_eq!(account.last_name, "");
    }

    #[test]
    fn test_missing_names_use_default() {
        let account = normalize_account(raw(None, None, None));
        assert_eq!(account.first_name, DEFAULT_FIRST_NAME);
        assert_eq!(account.last_name, "");
        assert_eq!(account.name.as_deref(), Some(DEFAULT_FIRST_NAME));
    }

    #[test]
    fn test_normalize_accounts_handles_absent_list() {
        assert!(normalize_accounts(None).is_empty());
        let accounts = normalize_accounts(Some(vec![raw(Some("Ana Pop"), None, None)]));
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].last_name, "Pop");
    }
}
