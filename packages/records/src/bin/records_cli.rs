//! CLI for running record mutations against the configured database
//!
//! Results are printed as JSON, one document per invocation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use records_core::common::RecordError;
use records_core::config::Config;
use records_core::domains::fields::StaticFieldRegistry;
use records_core::domains::records::{
    create_record, delete_record, get_record, update_record, Delta,
};
use records_core::kernel::{EngineDeps, PgRecordStore};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "records_cli")]
#[command(about = "Create, update and delete business records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the database migrations
    Migrate,

    /// Create a record from a JSON delta
    Create {
        #[arg(long = "type")]
        type_slug: String,
        #[arg(long)]
        actor: String,
        #[arg(long, default_value = "{}")]
        data: String,
        /// Comma-separated visibility roles
        #[arg(long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
    },

    /// Patch a record with a JSON delta
    Update {
        #[arg(long = "type")]
        type_slug: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        actor: String,
        #[arg(long, default_value = "{}")]
        data: String,
        /// Comma-separated visibility roles (empty string clears them)
        #[arg(long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
    },

    /// Delete a record
    Delete {
        #[arg(long = "type")]
        type_slug: String,
        #[arg(long)]
        id: String,
    },

    /// Fetch a record
    Get {
        #[arg(long = "type")]
        type_slug: String,
        #[arg(long)]
        id: String,
    },
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct Response<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
}

/// Process exit status: 0 on success, 2 for rejected input, 1 for store failures
fn exit_status(error: Option<&RecordError>) -> u8 {
    match error {
        None => 0,
        Some(e) if e.is_input_error() => 2,
        Some(_) => 1,
    }
}

fn output<T: Serialize>(outcome: Result<T, RecordError>) -> Result<ExitCode> {
    let status = exit_status(outcome.as_ref().err());
    let response = match outcome {
        Ok(result) => Response {
            success: true,
            code: None,
            message: None,
            result: Some(result),
        },
        Err(e) => Response {
            success: false,
            code: Some(e.code()),
            message: Some(e.to_string()),
            result: None,
        },
    };
    println!("{}", serde_json::to_string(&response)?);
    Ok(ExitCode::from(status))
}

fn parse_delta(data: &str) -> Result<Delta> {
    serde_json::from_str(data).context("--data must be a JSON object")
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,records_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    if let Commands::Migrate = cli.command {
        PgRecordStore::new(pool).migrate().await?;
        tracing::info!("Migrations complete");
        return Ok(ExitCode::SUCCESS);
    }

    let registry = match &config.fields_file {
        Some(path) => StaticFieldRegistry::from_file(path)?,
        None => {
            tracing::warn!("RECORDS_FIELDS_FILE not set; all fields are stored as given");
            StaticFieldRegistry::new()
        }
    };
    let deps = EngineDeps::postgres(pool, registry);

    match cli.command {
        Commands::Migrate => Ok(ExitCode::SUCCESS),
        Commands::Create {
            type_slug,
            actor,
            data,
            roles,
        } => {
            let delta = parse_delta(&data)?;
            output(create_record(&type_slug, &actor, &delta, roles.as_deref(), &deps).await)
        }
        Commands::Update {
            type_slug,
            id,
            actor,
            data,
            roles,
        } => {
            let delta = parse_delta(&data)?;
            output(update_record(&type_slug, &id, &actor, &delta, roles.as_deref(), &deps).await)
        }
        Commands::Delete { type_slug, id } => output(delete_record(&type_slug, &id, &deps).await),
        Commands::Get { type_slug, id } => output(get_record(&type_slug, &id, &deps).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_separates_input_from_store_errors() {
        assert_eq!(exit_status(None), 0);
        assert_eq!(exit_status(Some(&RecordError::InvalidActor("u9".into()))), 2);
        assert_eq!(exit_status(Some(&RecordError::InvalidType("a b".into()))), 2);
        assert_eq!(
            exit_status(Some(&RecordError::Store(anyhow::anyhow!("connection reset")))),
            1
        );
    }
}
