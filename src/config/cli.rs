use crate::config::{ClientConfig, TomlConfig};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "openhack")]
#[command(about = "Command-line client for the OpenHack backend")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Backend base URL")]
    pub api_base: Option<String>,

    #[arg(long, help = "Minimum visible loading duration in milliseconds")]
    pub min_loading_ms: Option<u64>,

    #[arg(long, help = "Where the session token is stored")]
    pub token_path: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check that the backend is reachable
    Ping,
    /// Tell whether an email is already registered
    Check { email: String },
    Register { email: String, password: String },
    Login { email: String, password: String },
    Whoami,
    Logout,
    /// Change the display name of the logged-in account
    EditName { name: String },
    #[command(subcommand)]
    Team(TeamCommand),
    #[command(subcommand)]
    Submission(SubmissionCommand),
    /// Show feature flags, optionally polling every N milliseconds
    Flags {
        #[arg(long, value_name = "MS")]
        watch: Option<u64>,
    },
    #[command(subcommand)]
    Vote(VoteCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum TeamCommand {
    Show,
    Members,
    Preview { id: String },
    Create { name: String },
    Rename { name: String },
    Table { table: String },
    Delete,
    Join { id: String },
    Leave,
    Kick { account_id: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SubmissionCommand {
    Name { value: String },
    Desc { value: String },
    Repo { value: String },
    Pres { value: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum VoteCommand {
    Status,
    Finalists,
    Cast { team_id: String },
}

impl CliConfig {
    /// Defaults, then the TOML file, then command-line overrides.
    pub fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_client_config(),
            None => ClientConfig::default(),
        };

        if let Some(url) = &self.api_base {
            config.api_base_url = url.clone();
        }
        if let Some(ms) = self.min_loading_ms {
            config.min_loading_duration = Duration::from_millis(ms);
        }
        if let Some(path) = &self.token_path {
            config.token_path = Some(path.clone());
        }
        Ok(config)
    }
}
