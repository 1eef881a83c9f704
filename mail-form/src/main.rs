use mail_form::{AppState, config, form::FormClient, proxy::Proxy, router};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cfg = config::load_config().expect("failed to locate or load config file");
    tracing::info!("Successfully loaded mail form config");

    tracing::info!("Proxying /api to {}", cfg.relay_base_url);

    let state = Arc::new(AppState {
        proxy: Proxy::new(cfg.relay_base_url.clone()).expect("Failed to create HTTP client"),
        client: FormClient::new(cfg.api_base_url()),
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener
        .local_addr()
        .expect("Failed to read bound address");

    tracing::info!("Mail form listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .expect("Failed to start server");
}
