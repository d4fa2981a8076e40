//! Reconciliation runner
//!
//! Thin glue binary: wires environment, logging, configuration and the
//! Postgres store, then invokes the requested engine. Scheduling belongs
//! to the outside; each invocation is one audited run.
//!
//! Usage:
//!   matchpoint reconcile            # tournaments, players, points
//!   matchpoint tournaments
//!   matchpoint players
//!   matchpoint points
//!   matchpoint merge <to> <from>    # merge <from> into <to>

use matchpoint::config::AppConfig;
use matchpoint::errors::{ReconError, Result};
use matchpoint::reconcile::{
    apply_points_rules, merge_players, process_players, process_tournaments,
};
use matchpoint::store::PgStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config);

    info!(version = matchpoint::VERSION, "matchpoint reconciliation runner starting");

    let store = PgStore::connect(&config.database).await?;
    let server = config.reconcile.server_name.as_str();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("reconcile");

    match command {
        "reconcile" => {
            process_tournaments(&store, server).await?;
            process_players(&store, server).await?;
            apply_points_rules(&store, server).await?;
        }
        "tournaments" => {
            process_tournaments(&store, server).await?;
        }
        "players" => {
            process_players(&store, server).await?;
        }
        "points" => {
            apply_points_rules(&store, server).await?;
        }
        "merge" => {
            let (to, from) = match (args.get(1), args.get(2)) {
                (Some(to), Some(from)) => (to.as_str(), from.as_str()),
                _ => {
                    return Err(ReconError::MissingParameter {
                        name: "merge <to_code> <from_code>".into(),
                    })
                }
            };
            let report = merge_players(&store, server, to, from).await?;
            info!(
                batch_id = %report.batch_id,
                rows_affected = report.rows_affected,
                "merge complete"
            );
        }
        other => {
            return Err(ReconError::Validation {
                message: format!("unknown command: {other}"),
            })
        }
    }

    info!("runner finished");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.observability.log_level.clone()));

    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
