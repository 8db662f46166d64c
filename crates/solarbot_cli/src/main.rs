//! Command-line front end for the SolarBot panel registry.
//!
//! # Responsibility
//! - Parse commands and dispatch them to the request handlers.
//! - Print each response as `<status code>` followed by its JSON body.
//! - Exit non-zero for any non-2xx response.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde_json::json;
use solarbot_api::{ApiResponse, PanelHandlers};
use solarbot_core::{config::DB_PATH_ENV, default_log_level, init_logging, PanelId, StoreConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "solarbot")]
#[command(version, about = "Manage solar panel monitoring records")]
struct Cli {
    /// SQLite file backing the panel collection
    #[arg(long, env = DB_PATH_ENV, default_value = solarbot_core::config::DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Directory for rolling log files; logging stays off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every panel
    List,
    /// Show one panel
    Get { id: PanelId },
    /// Register a new panel
    Create(PanelArgs),
    /// Replace every mutable field of a panel
    Update {
        id: PanelId,
        #[command(flatten)]
        panel: PanelArgs,
    },
    /// Remove a panel
    Delete { id: PanelId },
    /// Show fleet statistics
    Stats,
    /// Create a sample panel to check the store end to end
    Smoke,
}

#[derive(Args)]
struct PanelArgs {
    /// Raw JSON request body; overrides the field flags
    #[arg(long)]
    body: Option<String>,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    location: String,
    /// Rated capacity in kW
    #[arg(long, default_value_t = 0.0)]
    capacity: f64,
    /// Current generation in kW
    #[arg(long, default_value_t = 0.0)]
    generation: f64,
    /// Active, Inactive or Maintenance
    #[arg(long, default_value = "Active")]
    status: String,
}

impl PanelArgs {
    fn into_body(self, id: Option<PanelId>) -> String {
        if let Some(body) = self.body {
            return body;
        }
        let mut body = json!({
            "name": self.name,
            "location": self.location,
            "capacityKW": self.capacity,
            "currentGenerationKW": self.generation,
            "operationStatus": self.status,
        });
        if let Some(id) = id {
            body["id"] = json!(id);
        }
        body.to_string()
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = std::path::absolute(log_dir)
            .with_context(|| format!("cannot resolve log dir `{}`", log_dir.display()))?;
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).context("failed to initialize logging")?;
    }

    let handlers = PanelHandlers::from_config(StoreConfig::new(cli.db));
    let response = match cli.command {
        Command::List => handlers.list_panels(),
        Command::Get { id } => handlers.get_panel(id),
        Command::Create(panel) => handlers.create_panel(&panel.into_body(None)),
        Command::Update { id, panel } => handlers.update_panel(id, &panel.into_body(Some(id))),
        Command::Delete { id } => handlers.delete_panel(id),
        Command::Stats => handlers.get_statistics(),
        Command::Smoke => run_smoke(&handlers),
    };

    print_response(&response)?;
    Ok(if response.status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_smoke(handlers: &PanelHandlers) -> ApiResponse {
    let body = json!({
        "name": "Smoke Test Panel",
        "location": "Sao Paulo, SP",
        "capacityKW": 10.0,
        "currentGenerationKW": 5.0,
        "operationStatus": "Active",
    });
    let response = handlers.create_panel(&body.to_string());
    if let Some(location) = &response.location {
        info!("event=smoke module=cli status=ok location={location}");
    }
    response
}

fn print_response(response: &ApiResponse) -> Result<()> {
    println!("{}", response.status.code());
    if let Some(location) = &response.location {
        println!("Location: {location}");
    }
    if let Some(body) = &response.body {
        println!("{}", serde_json::to_string_pretty(body)?);
    }
    Ok(())
}
