use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sharecane_server::config::Config;
use sharecane_server::routes;
use sharecane_server::state::AppState;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // JSON logs in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sharecane_server=info,tower_http=info"));

    if config.is_dev {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    }

    info!("ShareCane server starting");

    let cors = if config.is_dev {
        info!("CORS: permissive (dev mode)");
        CorsLayer::permissive()
    } else {
        tracing::warn!("CORS: restrictive (production mode), cross-origin requests will be denied");
        CorsLayer::new()
    };

    let app_state = AppState::new(&config).expect("Failed to build HTTP client");
    info!(
        timeout = ?config.fetch_timeout,
        cache_ttl = ?config.cache_ttl,
        "Page fetching configured"
    );

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = routes::router(app_state)
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer)
        .layer(cors);

    let addr = config.server_addr();
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
