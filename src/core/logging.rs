use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Inizializza tracing. Il filtro si legge da RUST_LOG, default `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
