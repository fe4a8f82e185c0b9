// Budget Admin - Mock API Server
// In-memory Budgets collection over REST, reset on every start

use anyhow::{Context, Result};
use budget_admin::api::{router, AppState};
use budget_admin::{logging, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init("budget_admin=info,budget_server=info,tower_http=info");

    let config = ServerConfig::from_env()?;
    let state = AppState::seeded();
    let budget_count = state.budgets.lock().await.len();

    let app = router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, budgets = budget_count, "🚀 Budget mock API listening");
    info!("📊 GET/POST /api/budgets, GET/PUT/DELETE /api/budgets/:id");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
    }
}
