use crate::cli::ServeArgs;
use crate::infra::{AppState, Mailer, SubmissionStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use kampus_assessment::config::AppConfig;
use kampus_assessment::error::AppError;
use kampus_assessment::telemetry;
use kampus_assessment::workflows::assessment::{
    AssessmentService, Evaluator, NotificationTemplates, XlsxReportRenderer,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let key = config.assessment.answer_key()?;
    for problem in key.validate() {
        warn!(%problem, "answer key problem");
    }
    let evaluator = Arc::new(Evaluator::new(
        Arc::new(key),
        config.assessment.classifier.clone(),
    ));

    let store = SubmissionStore::from_config(&config.assessment);
    let mailer = Mailer::from_config(&config.mail)?;
    info!(store = %store.describe(), mailer = mailer.describe(), "assessment backends selected");

    let templates = NotificationTemplates::new(
        config.notifications.company_name.clone(),
        config.notifications.hr_recipients.clone(),
        config.notifications.disclose_score,
    );
    let assessment_service = Arc::new(AssessmentService::new(
        evaluator,
        Arc::new(store),
        Arc::new(mailer),
        Arc::new(XlsxReportRenderer),
        templates,
    ));

    let app = with_service_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
