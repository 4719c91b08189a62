use crate::cli::ServeArgs;
use crate::infra::{sample_catalog, AppState};
use crate::routes::with_recommendation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use transfer_match::config::AppConfig;
use transfer_match::error::AppError;
use transfer_match::telemetry;
use transfer_match::workflows::catalog::CatalogProvider;
use transfer_match::workflows::recommendation::{HttpCompletionClient, RecommendationService};

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

    let provider = match &config.catalog.csv_path {
        Some(path) => {
            let provider = CatalogProvider::from_csv_path(path)?;
            info!(path = %path.display(), colleges = provider.len(), "catalog loaded from CSV");
            provider
        }
        None => {
            let provider = CatalogProvider::new(sample_catalog());
            info!(colleges = provider.len(), "using bundled sample catalog");
            provider
        }
    };

    let mut service = RecommendationService::new(Arc::new(provider));
    if let Some(base_url) = config.completion.base_url.clone() {
        let client = HttpCompletionClient::new(
            base_url,
            config.completion.api_key.clone(),
            config.completion.model.clone(),
            config.completion.timeout,
        )?;
        service = service.with_completion(Arc::new(client), config.completion.timeout);
        info!(model = %config.completion.model, "AI augmentation enabled");
    } else {
        info!("no completion endpoint configured; AI factors stay neutral");
    }

    let app = with_recommendation_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "transfer recommendation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
