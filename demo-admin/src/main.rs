//! Demo host for the admin gate: in-memory collaborators, one seeded
//! content item, plain HTTP listener. Configure TLS enforcement through
//! the `ADMIN_TLS_MODE` / `ADMIN_SECURE_ORIGIN` / `ADMIN_TRUST_PROXY`
//! environment variables.

use std::net::SocketAddr;
use std::sync::Arc;

use admin_gate::{
    Gate, GateConfig, InMemoryContentResolver, InMemorySessionStore, InMemoryUserDirectory,
};
use admin_gate_axum::{GateState, admin_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "admin_gate_axum=debug,admin_gate=debug,demo_admin=debug,info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = GateConfig::from_env()?;
    tracing::info!("Gate configuration: {config:?}");

    let sessions = Arc::new(InMemorySessionStore::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let content = Arc::new(InMemoryContentResolver::new());
    content.publish("1", "/welcome-to-ghost/").await;

    let gate = Gate::new(config, sessions, users, content);
    let app = admin_router(GateState::new(gate, false));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Admin gate listening on http://{addr}/ghost/");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
