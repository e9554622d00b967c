//! API server entry point.

use api::config::{Config, LogFormat};
use domain::{InMemoryProductRepository, ProductRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use product_store::PostgresProductRepository;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM), then cancels `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }

    shutdown.cancel();
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve<R: ProductRepository + 'static>(
    config: &Config,
    repository: R,
    metrics_handle: PrometheusHandle,
) {
    let shutdown = CancellationToken::new();
    let state = api::create_state(repository, config.request_timeout, shutdown.clone());
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("server error");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the repository and serve
    match config.database_url.as_deref() {
        Some(url) => {
            let repository =
                PostgresProductRepository::connect(url, config.database_max_connections)
                    .await
                    .expect("failed to connect to PostgreSQL");
            repository
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("using PostgreSQL product repository");
            serve(&config, repository, metrics_handle).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory product repository");
            serve(&config, InMemoryProductRepository::new(), metrics_handle).await;
        }
    }

    tracing::info!("server shut down gracefully");
}
