//! User Service - command-line driver for user creation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use common::ServiceConfig;
use domain::CreateParams;
use user_service_lib::config::UserServiceConfig;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User account creation and lookup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a single user and print it
    Create {
        #[arg(long)]
        username: String,
        #[arg(long, env = "USER_SERVICE_CREATE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Explicit user ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,
        /// `user` or `admin` (defaults to `user`)
        #[arg(long)]
        role: Option<String>,
    },
    /// Create users from a file, one `username,password[,role[,id]]` per line
    Import {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing before the rest of the config so its warnings show
    let service_config = ServiceConfig::from_env("user-service", "USER_SERVICE");
    common::init_tracing(&service_config.log_level)?;

    let config = UserServiceConfig::from_env()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            username,
            password,
            id,
            role,
        } => {
            let params = CreateParams {
                id,
                username,
                password,
                role,
            };

            match user_service_lib::run_create(&config, params).await {
                Ok(user) => println!("{}", serde_json::to_string_pretty(&user)?),
                Err(err) => {
                    eprintln!("error [{}]: {}", err.code(), err.user_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Import { path } => {
            let summary = user_service_lib::run_import(&config, &path).await?;

            for user in &summary.created {
                println!("{}", serde_json::to_string(user)?);
            }
            for failure in &summary.failures {
                eprintln!(
                    "line {}: [{}] {}",
                    failure.line, failure.code, failure.message
                );
            }
            eprintln!(
                "created {}, failed {}",
                summary.created.len(),
                summary.failures.len()
            );
        }
    }

    Ok(())
}
