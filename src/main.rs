use clap::Parser;
use openhack_client::adapters::SubmissionField;
use openhack_client::config::cli::{SubmissionCommand, TeamCommand, VoteCommand};
use openhack_client::config::Command;
use openhack_client::core::{ConfigProvider, TokenStore};
use openhack_client::utils::error::ClientError;
use openhack_client::utils::validation::{self, Validate};
use openhack_client::utils::{logger, profile};
use openhack_client::{CliConfig, FileTokenStore, MemoryTokenStore, OpenHack};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Config file: {:?}", cli.config);

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    let tokens: Arc<dyn TokenStore> = match config.token_path() {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => {
            tracing::warn!("No token path available; the session will not persist");
            Arc::new(MemoryTokenStore::new())
        }
    };

    let client = OpenHack::from_config(&config, tokens)?;

    if let Err(e) = run(&client, cli.command).await {
        client.state().error.set_error(&e);
        let message = client
            .state()
            .error
            .message()
            .unwrap_or_else(|| e.user_friendly_message());
        tracing::error!("❌ Command failed (status {}): {}", e.status(), e);
        eprintln!("❌ {}", message);

        let exit_code = match &e {
            ClientError::Api(api) if api.is_unauthorized() => 2,
            ClientError::Config { .. } | ClientError::InvalidConfigValue { .. } => 3,
            _ => 1,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(client: &OpenHack, command: Command) -> openhack_client::Result<()> {
    match command {
        Command::Ping => {
            let pong = client.ping().await?;
            println!("{}", pong);
        }
        Command::Check { email } => {
            validation::validate_email("email", &email)?;
            print_json(&client.accounts().check(&email).await?)?;
        }
        Command::Register { email, password } => {
            validation::validate_email("email", &email)?;
            validation::validate_non_empty_string("password", &password)?;
            print_json(&client.accounts().register(&email, &password).await?)?;
        }
        Command::Login { email, password } => {
            print_json(&client.accounts().login(&email, &password).await?)?;
        }
        Command::Whoami => {
            let account = client.accounts().whoami().await?;
            print_json(&serde_json::json!({
                "account": account,
                "profileGradient": profile::profile_gradient(Some(account.id.as_str())),
            }))?;
        }
        Command::Logout => {
            client.logout();
            println!("Logged out");
        }
        Command::EditName { name } => {
            let name = validation::trim_string(&name);
            validation::validate_non_empty_string("name", &name)?;
            print_json(&client.accounts().edit_name(&name).await?)?;
        }
        Command::Team(command) => run_team(client, command).await?,
        Command::Submission(command) => run_submission(client, command).await?,
        Command::Flags { watch } => run_flags(client, watch).await?,
        Command::Vote(command) => run_vote(client, command).await?,
    }
    Ok(())
}

async fn run_team(client: &OpenHack, command: TeamCommand) -> openhack_client::Result<()> {
    let teams = client.teams();
    match command {
        TeamCommand::Show => print_json(&teams.get_team().await?),
        TeamCommand::Members => print_json(&teams.load_members().await?),
        TeamCommand::Preview { id } => print_json(&teams.preview(&id).await?),
        TeamCommand::Create { name } => {
            let name = validation::sanitize_text(&name);
            validation::validate_non_empty_string("name", &name)?;
            print_json(&teams.create_team(&name).await?)
        }
        TeamCommand::Rename { name } => {
            let name = validation::sanitize_text(&name);
            validation::validate_non_empty_string("name", &name)?;
            print_json(&teams.change_team_name(&name).await?)
        }
        TeamCommand::Table { table } => print_json(&teams.change_table(table.trim()).await?),
        TeamCommand::Delete => print_json(&teams.delete_team().await?),
        TeamCommand::Join { id } => print_json(&teams.join(&id).await?),
        TeamCommand::Leave => print_json(&teams.leave().await?),
        TeamCommand::Kick { account_id } => print_json(&teams.kick(&account_id).await?),
    }
}

async fn run_submission(
    client: &OpenHack,
    command: SubmissionCommand,
) -> openhack_client::Result<()> {
    let (field, value) = match command {
        SubmissionCommand::Name { value } => {
            (SubmissionField::Name, validation::sanitize_text(&value))
        }
        SubmissionCommand::Desc { value } => {
            (SubmissionField::Desc, validation::sanitize_text(&value))
        }
        SubmissionCommand::Repo { value } => (SubmissionField::Repo, value.trim().to_string()),
        SubmissionCommand::Pres { value } => (SubmissionField::Pres, value.trim().to_string()),
    };

    let needs_url = matches!(field, SubmissionField::Repo | SubmissionField::Pres);
    if needs_url && !validation::is_url(&value) {
        return Err(ClientError::Validation {
            message: format!("{} must be an http(s) URL", field.as_str()),
        });
    }

    let team = client.submissions().update(field, &value).await?;
    print_json(&team)
}

async fn run_flags(client: &OpenHack, watch: Option<u64>) -> openhack_client::Result<()> {
    let flags = client.flags();
    print_json(&flags.fetch_flags().await?)?;

    let Some(interval_ms) = watch else {
        return Ok(());
    };

    let mut updates = client.state().flags.subscribe();
    updates.borrow_and_update();
    flags.configure_polling(Duration::from_millis(interval_ms.max(1)));
    flags.start_polling();
    tracing::info!("Watching flags every {}ms, press Ctrl-C to stop", interval_ms);

    let mut last = flags.current();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = updates.borrow_and_update().clone();
                // 每次輪詢都會寫入，僅在內容變更時輸出
                if current != last {
                    if let Some(current) = &current {
                        print_json(current)?;
                    }
                    last = current;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    flags.stop_polling();
    Ok(())
}

async fn run_vote(client: &OpenHack, command: VoteCommand) -> openhack_client::Result<()> {
    let voting = client.voting();
    match command {
        VoteCommand::Status => print_json(&voting.fetch_voting_data().await?),
        VoteCommand::Finalists => print_json(&voting.fetch_finalists().await?),
        VoteCommand::Cast { team_id } => {
            voting.fetch_voting_data().await?;
            if !voting.is_voting_open() {
                return Err(ClientError::Validation {
                    message: "voting is closed".to_string(),
                });
            }
            if voting.has_user_voted() {
                return Err(ClientError::Validation {
                    message: "you have already voted".to_string(),
                });
            }
            if !voting.finalists().iter().any(|team| team.id == team_id) {
                tracing::warn!("{} is not a known finalist, sending anyway", team_id);
            }
            print_json(&voting.cast_vote(&team_id).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> openhack_client::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
