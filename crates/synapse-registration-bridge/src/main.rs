//! Synapse Registration Bridge - Entry point.

use synapse_registration_bridge::{
    api::{create_router, AppState, Page},
    config::Config,
    registration::RegistrationBridge,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        server = %config.synapse.server_url,
        protocol = %config.synapse.protocol,
        register_admins = config.synapse.register_admins,
        "Starting Synapse Registration Bridge"
    );

    let bridge = match RegistrationBridge::new(&config.synapse) {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to create Synapse client: {:#}", e);
            std::process::exit(1);
        }
    };

    let page = match Page::new() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to compile page template: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(AppState::new(bridge, page));

    // Bind to address
    let addr = SocketAddr::new(config.server.listen_addr, config.server.port);

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
