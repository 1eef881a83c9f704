use std::sync::Arc;

use mail_relay::{config, handlers, service::MailRelay};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().expect("failed to locate or load config file");
    tracing::info!("Successfully loaded mail relay config");

    // Setup relay
    let relay = Arc::new(MailRelay::from_config(&cfg));
    tracing::info!(
        "Relaying mail as {} through {:?} transport",
        relay.sender(),
        cfg.transport
    );

    // Setup router
    let router = handlers::router(relay);

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener
        .local_addr()
        .expect("Failed to read bound address");

    tracing::info!("Mail relay starting, listening on {}", addr);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
