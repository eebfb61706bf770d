//! HTTP front for the lookup handler.
//!
//! Serves a single endpoint, `GET /?ip=<addr>`, which answers with the same
//! status and body the handler produces for an invocation envelope. The
//! caller's socket address stands in for the request-context source IP.

mod handlers;

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;

use crate::handler::LookupHandler;

use handlers::lookup_handler;
pub use handlers::LookupParams;

/// Builds the router. Serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn router(handler: LookupHandler) -> Router {
    Router::new()
        .route("/", get(lookup_handler))
        .with_state(handler)
}

/// Binds `bind` and serves lookups until Ctrl-C.
pub async fn start_lookup_server(bind: SocketAddr, handler: LookupHandler) -> Result<(), anyhow::Error> {
    let app = router(handler);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind lookup server to {}: {}", bind, e))?;

    log::info!("Lookup server listening on http://{}/", bind);
    log::info!("  - Lookup: http://{}/?ip=<address>", bind);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow::anyhow!("Lookup server error: {}", e))?;

    log::info!("Lookup server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
