//! Account Admin - operator tool for the user account store

use account_auth::{AccountService, CreateUser, TokenPayload, UserService};
use account_db::Database;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;

/// Account Admin - manage user accounts from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "ACCOUNT_CONFIG", default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new user (username + password, or mobile)
    CreateUser {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Verify credentials, record the login and print the token payload
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Print a user by ID
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Resolve a token payload (JSON) back to its user
    Resolve {
        #[arg(long)]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    init_logging(&config.logging.level);

    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path),
        None => info!("Config file not found at {}, using defaults", args.config),
    }

    if let Some(parent) = Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
    }

    let db = Database::new(&config.database.url()).await?;
    let service = AccountService::new(db);

    run(&service, args.command).await
}

async fn run(service: &AccountService<Database>, command: Command) -> Result<()> {
    match command {
        Command::CreateUser {
            username,
            password,
            mobile,
            first_name,
            last_name,
            email,
        } => {
            let user = service
                .create_user(CreateUser {
                    username,
                    password,
                    mobile,
                    first_name,
                    last_name,
                    email,
                })
                .await?;
            print_json(&user)
        }
        Command::Login { username, password } => {
            let user = service.find_by_credential(&username, &password).await?;
            let user = service.record_login(user.id).await?;
            info!("User {} logged in", user.id);
            print_json(&service.token_payload(&user))
        }
        Command::Show { id } => print_json(&service.find_user_by_id(id).await?),
        Command::Resolve { payload } => {
            let payload: TokenPayload =
                serde_json::from_str(&payload).context("Failed to parse token payload")?;
            print_json(&service.validate_token_payload(&payload).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_user() {
        let args = Args::try_parse_from([
            "account-admin",
            "create-user",
            "--username",
            "alice",
            "--password",
            "secret123",
            "--first-name",
            "Alice",
        ])
        .unwrap();

        assert_eq!(args.config, "config/default.toml");
        match args.command {
            Command::CreateUser {
                username,
                first_name,
                mobile,
                ..
            } => {
                assert_eq!(username.as_deref(), Some("alice"));
                assert_eq!(first_name.as_deref(), Some("Alice"));
                assert!(mobile.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_login_requires_password() {
        assert!(Args::try_parse_from(["account-admin", "login", "--username", "alice"]).is_err());
    }

    #[tokio::test]
    async fn test_run_against_memory_store() {
        let service = AccountService::new(Database::in_memory().await.unwrap());

        run(
            &service,
            Command::CreateUser {
                username: Some("alice".to_string()),
                password: Some("secret123".to_string()),
                mobile: None,
                first_name: None,
                last_name: None,
                email: None,
            },
        )
        .await
        .unwrap();

        run(
            &service,
            Command::Login {
                username: "alice".to_string(),
                password: "secret123".to_string(),
            },
        )
        .await
        .unwrap();

        let user = service.find_user_by_id(1).await.unwrap();
        assert!(user.last_login.is_some());

        run(
            &service,
            Command::Resolve {
                payload: r#"{"sub":1,"username":"alice"}"#.to_string(),
            },
        )
        .await
        .unwrap();

        let bad_login = run(
            &service,
            Command::Login {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await;
        assert!(bad_login.is_err());
    }
}
