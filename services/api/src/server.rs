use crate::cli::ServeArgs;
use crate::infra::{AppState, MetricsObserver};
use crate::rate_limit::RateLimiter;
use crate::routes::with_rating_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rmbs_rating::config::AppConfig;
use rmbs_rating::error::AppError;
use rmbs_rating::rating::RatingService;
use rmbs_rating::telemetry;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let rating_service = Arc::new(RatingService::new(Arc::new(MetricsObserver::default())));
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));

    let app = with_rating_routes(rating_service, limiter)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "credit rating service ready"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
