//! LIS ingestion server binary.

use lis_hl7::{MessageProcessor, RoutingConfig};
use lis_service::LisServer;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 6661;
const DEFAULT_RECEIVING_APPLICATION: &str = "LISConnect";
const DEFAULT_RECEIVING_FACILITY: &str = "Central Laboratory";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Routing identity stamped onto every report, from env or defaults
    let routing = RoutingConfig {
        receiving_application: std::env::var("LIS_RECEIVING_APP")
            .unwrap_or_else(|_| DEFAULT_RECEIVING_APPLICATION.to_string()),
        receiving_facility: std::env::var("LIS_RECEIVING_FACILITY")
            .unwrap_or_else(|_| DEFAULT_RECEIVING_FACILITY.to_string()),
    };
    tracing::info!(
        application = %routing.receiving_application,
        facility = %routing.receiving_facility,
        "routing configuration loaded"
    );

    // Get port from env or use default
    let port = std::env::var("LIS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Starting LIS ingestion server on {}", addr);

    let server = LisServer::new(MessageProcessor::new(routing));
    server.serve(listener).await?;

    Ok(())
}
