use std::sync::Arc;

use lptrail::api;
use lptrail::config::Config;
use lptrail::db::{self, Repository};
use lptrail::error::AppError;
use lptrail::history::{HistoryService, HistorySettings};
use lptrail::logging;
use lptrail::rank::trajectory::LpModel;
use lptrail::riot::RiotClient;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    if let Err(e) = run().await {
        error!(error = ?e, "🐙 ❌ Fatal error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    info!("🐙 Starting...");

    let pool = db::connect(&config.database_url, 5).await?;
    let repo = Repository::new(pool);

    let riot = RiotClient::new(
        config.riot_api_key.clone(),
        config.riot_rate_limit_per_second,
    )?;
    tokio::spawn(riot.metrics().log_loop());

    let model = LpModel {
        win_gain: config.lp_win_gain,
        loss_penalty: config.lp_loss_penalty,
    };
    let history = HistoryService::new(
        repo,
        Arc::new(riot),
        model,
        HistorySettings::from(&config),
    );

    let app = api::router(Arc::new(history));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "🌐 Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🐙 Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = ?e, "Failed to listen for shutdown signal");
    }
}
