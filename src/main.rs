use dotenv::dotenv;
use log::info;
use std::net::SocketAddr;
use warp::Filter;

use stock_quote_backend::config::Settings;
use stock_quote_backend::handlers::AppState;
use stock_quote_backend::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let settings = Settings::from_env()?;
    info!("Using PORT: {}", settings.port);

    // Bind to 0.0.0.0 so the host platform can route to us
    let addr: SocketAddr = ([0, 0, 0, 0], settings.port).into();
    info!("Will bind to: {}", addr);

    let cors = routes::cors(&settings.cors_origins);
    let state = AppState::from_settings(&settings);

    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS for {:?}.", settings.cors_origins);

    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;
    Ok(())
}
