use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryGovernanceRepository, InMemoryWorkflowNotifier};
use crate::routes::with_governance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use duvri_gov::config::AppConfig;
use duvri_gov::error::AppError;
use duvri_gov::telemetry;
use duvri_gov::workflows::interference::{
    EstimatorRates, ExtraCostService, GovernanceState, ThresholdPolicy,
};
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

    let repository = Arc::new(InMemoryGovernanceRepository::default());
    let notifier = Arc::new(InMemoryWorkflowNotifier::default());
    let service = Arc::new(ExtraCostService::new(
        repository,
        notifier,
        EstimatorRates::default(),
    ));
    let governance_state = GovernanceState {
        service,
        thresholds: ThresholdPolicy::from(&config.thresholds),
    };

    let app = with_governance_routes(governance_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "interference-cost governance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
