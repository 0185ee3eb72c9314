mod app;
mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod utils;

use app::AppState;
use config::ServerConfig;
use invoker::Invoker;
use log::info;
use tokio::net::TcpListener;
use utils::shutdown::shutdown_signal;

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG can live there too
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    let invoker = Invoker::from_config(&config.invoker).expect("Failed to build OCR invoker");

    info!(
        "Using OCR engine `{}` with a {}s timeout",
        invoker.engine_name(),
        invoker.timeout().as_secs()
    );

    let app = app::router(AppState::new(invoker, config.max_image_bytes));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
