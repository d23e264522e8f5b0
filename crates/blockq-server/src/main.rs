//! blockq server binary entry point.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use blockq_adapter_sim::SimulatorBackend;
use blockq_server::{AppState, ServerArgs, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.default_filter())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.into_config();
    let bind_addr = config.bind_address;

    let backend = Arc::new(SimulatorBackend::with_max_qubits(config.max_sim_qubits));
    tracing::info!(
        max_qubits = config.max_sim_qubits,
        "registered simulator backend"
    );

    let state = Arc::new(AppState::new(backend, config));
    let app = create_router(state);

    tracing::info!("Starting blockq server at http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
