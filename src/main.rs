use env_logger;
use log::info;
use dotenv::dotenv;
use warp::Filter;
use std::net::SocketAddr;
use std::sync::Arc;

use listing_appraisal::config::AppConfig;
use listing_appraisal::handlers::appraisal::AppState;
use listing_appraisal::routes;
use listing_appraisal::services::listing::build_client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    info!("Using PORT: {}", config.port);

    // Bind to 0.0.0.0 for container deployments
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let client = build_client(&config.user_agent).map_err(|e| anyhow::anyhow!(e))?;
    let state = Arc::new(AppState { client, config });

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;

    Ok(())
}
