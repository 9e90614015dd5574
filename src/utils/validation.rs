use crate::utils::error::{ClientError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").expect("valid regex"));
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Into<String>, reason: impl Into<String>) -> ClientError {
    ClientError::InvalidConfigValue {
        field: field.to_string(),
        value: value.into(),
        reason: reason.into(),
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn validate_url(field: &str, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(invalid(field, raw, "URL cannot be empty"));
    }

    let url =
        Url::parse(raw).map_err(|e| invalid(field, raw, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            raw,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    Ok(())
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    match path {
        "" => Err(invalid(field, path, "Path cannot be empty")),
        p if p.contains('\0') => Err(invalid(field, path, "Path contains null bytes")),
        _ => Ok(()),
    }
}

pub fn validate_positive_duration(field: &str, value: Duration) -> Result<()> {
    if value.is_zero() {
        return Err(invalid(field, format!("{:?}", value), "Duration must be greater than zero"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    if !is_email(value) {
        return Err(ClientError::Validation {
            message: format!("{} is not a valid email address: {}", field_name, value),
        });
    }
    Ok(())
}

/// Trims and collapses runs of whitespace into single spaces.
pub fn trim_string(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Strips `<script>` blocks and any remaining tags from user text.
pub fn sanitize_text(s: &str) -> String {
    let trimmed = trim_string(s);
    let without_scripts = SCRIPT_BLOCK.replace_all(&trimmed, "");
    HTML_TAG.replace_all(&without_scripts, "").into_owned()
}

pub fn is_email(s: &str) -> bool {
    EMAIL.is_match(s.trim())
}

pub fn is_url(s: &str) -> bool {
    Url::parse(s.trim())
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "https://api.openhack.ro").is_ok());
        assert!(validate_url("api.base_url", "http://localhost:9000/").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "invalid-url").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_duration() {
        let field = "flags.poll_interval_ms";
        assert!(validate_positive_duration(field, Duration::from_millis(1)).is_ok());
        assert!(validate_positive_duration(field, Duration::ZERO).is_err());
    }

    #[test]
    fn test_trim_and_sanitize() {
        assert_eq!(trim_string("  hello \n  world\t"), "hello world");
        assert_eq!(
            sanitize_text("<b>Team</b> <script>alert('x')</script>Rocket"),
            "Team Rocket"
        );
        assert_eq!(sanitize_text("<SCRIPT type=\"x\">bad()</SCRIPT>ok"), "ok");
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("hacker@openhack.ro"));
        assert!(is_email("  hacker@openhack.ro "));
        assert!(!is_email("hacker@openhack"));
        assert!(!is_email("no at sign.ro"));
        assert!(validate_email("email", "bad").is_err());
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://github.com/openhack/app"));
        assert!(!is_url("github.com/openhack/app"));
        assert!(!is_url("mailto:team@openhack.ro"));
    }
}
