//! `flatfile`: command-line client for the Flatfile REST API.
//!
//! Every subcommand exchanges `FLATFILE_CLIENT_ID` / `FLATFILE_SECRET` for an
//! access token, runs one API call, and prints the validated result as
//! pretty JSON on stdout.
//!
//! - **`users`**: list users in the account.
//! - **`environments list|create`**
//! - **`spaces list|create`**
//! - **`workbooks list|create`**: `create` reads a workbook definition file.
//! - **`agents list|create`**: `create` reads an agent definition file.
//! - **`events list`**: workbook record changes are also logged to stderr.
//!
//! Definition files are JSON, read from a path or stdin (`-`), and are
//! validated before any request is made.
//!
//! # Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | the API call failed |
//! | 2 | bad configuration or input file |
//!
//! Logging goes to stderr; set `RUST_LOG=flatfile_client=debug` to see each
//! request.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use flatfile_api::{
    AgentInput, CreateEnvironmentRequest, CreateSpaceRequest, ListWorkbooksQuery, WorkbookInput,
};
use flatfile_client::{
    operations, route_event, AppEnv, ClientConfig, HttpError, ReqwestTransport, Route,
};
use flatfile_core::{Decode, EnvironmentId, SpaceConfigId, SpaceId, WorkbookId};
use serde::Serialize;

/// flatfile: Flatfile REST API CLI
///
/// Credentials come from FLATFILE_CLIENT_ID and FLATFILE_SECRET;
/// FLATFILE_API_HOST overrides the API host.
#[derive(Parser)]
#[command(name = "flatfile", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List users in the account.
    Users,

    /// List or create environments.
    Environments {
        #[command(subcommand)]
        action: EnvironmentAction,
    },

    /// List or create spaces.
    Spaces {
        #[command(subcommand)]
        action: SpaceAction,
    },

    /// List or create workbooks.
    Workbooks {
        #[command(subcommand)]
        action: WorkbookAction,
    },

    /// List or deploy agents in an environment.
    Agents {
        #[command(subcommand)]
        action: AgentAction,
    },

    /// Inspect events in an environment.
    Events {
        #[command(subcommand)]
        action: EventAction,
    },
}

#[derive(Subcommand)]
enum EnvironmentAction {
    List,
    Create {
        #[arg(short = 'n', long)]
        name: String,

        /// Mark the environment as production.
        #[arg(long)]
        prod: bool,
    },
}

#[derive(Subcommand)]
enum SpaceAction {
    List {
        /// Print the whole page, pagination included.
        #[arg(long)]
        page: bool,
    },
    Create {
        #[arg(long, value_name = "ID")]
        space_config_id: SpaceConfigId,

        #[arg(long, value_name = "ID", env = "FLATFILE_ENVIRONMENT_ID")]
        environment_id: EnvironmentId,

        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(long, value_name = "ID")]
        primary_workbook_id: Option<WorkbookId>,
    },
}

#[derive(Subcommand)]
enum WorkbookAction {
    List {
        #[arg(long, value_name = "ID")]
        space_id: SpaceId,
    },
    /// Create a workbook from a JSON definition.
    Create {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum AgentAction {
    List {
        #[arg(long, value_name = "ID", env = "FLATFILE_ENVIRONMENT_ID")]
        environment_id: EnvironmentId,
    },
    /// Deploy an agent from a JSON definition (`topics`, `compiler`, `source`).
    Create {
        #[arg(long, value_name = "ID", env = "FLATFILE_ENVIRONMENT_ID")]
        environment_id: EnvironmentId,

        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum EventAction {
    List {
        #[arg(long, value_name = "ID", env = "FLATFILE_ENVIRONMENT_ID")]
        environment_id: EnvironmentId,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flatfile_client=info,flatfile=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().unwrap_or_else(|e| fatal(&e.to_string()));
    let transport = ReqwestTransport::from_config(&config)
        .unwrap_or_else(|e| fatal(&format!("failed to build HTTP client: {e}")));
    let env = AppEnv::unauthenticated(Arc::new(transport));

    if let Err(e) = run(cli.command, &config, &env).await {
        eprintln!("flatfile: {e}");
        process::exit(1);
    }
}

async fn run(command: Command, config: &ClientConfig, env: &AppEnv) -> Result<(), HttpError> {
    match command {
        Command::Users => {
            let env = authenticate(env, config).await?;
            print_json(&operations::list_users(&env).await?);
        }

        Command::Environments { action } => {
            let env = authenticate(env, config).await?;
            match action {
                EnvironmentAction::List => {
                    print_json(&operations::list_environments(&env).await?);
                }
                EnvironmentAction::Create { name, prod } => {
                    let request = CreateEnvironmentRequest {
                        name,
                        is_prod: prod,
                    };
                    print_json(&operations::create_environment(&env, &request).await?);
                }
            }
        }

        Command::Spaces { action } => {
            let env = authenticate(env, config).await?;
            match action {
                SpaceAction::List { page: true } => {
                    print_json(&operations::list_spaces_page(&env).await?);
                }
                SpaceAction::List { page: false } => {
                    print_json(&operations::list_spaces(&env).await?);
                }
                SpaceAction::Create {
                    space_config_id,
                    environment_id,
                    name,
                    primary_workbook_id,
                } => {
                    let request = CreateSpaceRequest {
                        space_config_id,
                        environment_id,
                        primary_workbook_id,
                        name,
                    };
                    print_json(&operations::create_space(&env, &request).await?);
                }
            }
        }

        Command::Workbooks { action } => match action {
            WorkbookAction::List { space_id } => {
                let env = authenticate(env, config).await?;
                let query = ListWorkbooksQuery { space_id };
                print_json(&operations::list_workbooks(&env, &query).await?);
            }
            WorkbookAction::Create { file } => {
                let input: WorkbookInput = read_definition(&file);
                let env = authenticate(env, config).await?;
                print_json(&operations::create_workbook(&env, &input).await?);
            }
        },

        Command::Agents { action } => match action {
            AgentAction::List { environment_id } => {
                let env = authenticate(env, config).await?;
                print_json(&operations::list_agents(&env, &environment_id).await?);
            }
            AgentAction::Create {
                environment_id,
                file,
            } => {
                let input: AgentInput = read_definition(&file);
                let env = authenticate(env, config).await?;
                print_json(&operations::create_agent(&env, &environment_id, &input).await?);
            }
        },

        Command::Events {
            action: EventAction::List { environment_id },
        } => {
            let env = authenticate(env, config).await?;
            let events = operations::list_events(&env, &environment_id).await?;
            for event in &events {
                match route_event(event) {
                    Route::Log => tracing::info!(id = %event.id, topic = %event.topic, "record change"),
                    Route::Ignore => {}
                }
            }
            print_json(&events);
        }
    }
    Ok(())
}

/// Exchange the configured credentials for a token and return an
/// environment carrying it.
async fn authenticate(env: &AppEnv, config: &ClientConfig) -> Result<AppEnv, HttpError> {
    let token = operations::create_token(env, &config.token_request()).await?;
    tracing::debug!("authenticated against {}", config.base_url());
    Ok(env.with_access_token(token))
}

/// Read and validate a JSON definition file. Exits on any failure.
fn read_definition<T: Decode>(path: &PathBuf) -> T {
    let text = read_input(path);
    let json: serde_json::Value = serde_json::from_str(&text)
        .unwrap_or_else(|e| fatal(&format!("{} is not valid JSON: {}", path.display(), e)));
    flatfile_core::decode(&json).unwrap_or_else(|errors| {
        fatal(&format!(
            "{} is not a valid {}:\n{}",
            path.display(),
            T::shape(),
            errors
        ))
    })
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path)
            .unwrap_or_else(|e| fatal(&format!("failed to read {}: {}", path.display(), e)))
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fatal(&format!("failed to render output: {e}")),
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("flatfile: {}", msg);
    process::exit(2);
}
