use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::SubmissionId;
use super::intake::RawSubmission;
use super::notify::Notifier;
use super::report::ReportRenderer;
use super::repository::{RepositoryError, SubmissionRepository};
use super::service::{AssessmentService, AssessmentServiceError};
use super::views;

type SharedService<R, N, G> = Arc<AssessmentService<R, N, G>>;

/// Router exposing the assessment form, submission, and HR result lookup.
pub fn assessment_router<R, N, G>(service: SharedService<R, N, G>) -> Router
where
    R: SubmissionRepository + 'static,
    N: Notifier + 'static,
    G: ReportRenderer + 'static,
{
    Router::new()
        .route("/", get(form_handler::<R, N, G>))
        .route("/submit", post(submit_handler::<R, N, G>))
        .route(
            "/api/v1/assessments/:submission_id",
            get(result_handler::<R, N, G>),
        )
        .with_state(service)
}

pub(crate) async fn form_handler<R, N, G>(
    State(service): State<SharedService<R, N, G>>,
) -> Html<String>
where
    R: SubmissionRepository + 'static,
    N: Notifier + 'static,
    G: ReportRenderer + 'static,
{
    Html(views::form_page(service.templates().company_name()))
}

pub(crate) async fn submit_handler<R, N, G>(
    State(service): State<SharedService<R, N, G>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    N: Notifier + 'static,
    G: ReportRenderer + 'static,
{
    let company = service.templates().company_name().to_string();
    let worker = Arc::clone(&service);
    // SMTP delivery blocks, keep it off the async workers.
    let joined =
        tokio::task::spawn_blocking(move || worker.submit(RawSubmission::from(fields))).await;

    let result = match joined {
        Ok(result) => result,
        Err(err) => {
            error!(error = %err, "submission worker panicked");
            let page = views::error_page(&company, "An unexpected error occurred.");
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response();
        }
    };

    match result {
        Ok(outcome) => {
            let page = views::thank_you_page(&company, &outcome.record.identity.name);
            (StatusCode::OK, Html(page)).into_response()
        }
        Err(AssessmentServiceError::Intake(violation)) => {
            let page = views::error_page(&company, &violation.to_string());
            (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
        }
        Err(other) => {
            error!(error = %other, "submission could not be recorded");
            let page = views::error_page(
                &company,
                "Your answers could not be saved. Please try again later.",
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response()
        }
    }
}

pub(crate) async fn result_handler<R, N, G>(
    State(service): State<SharedService<R, N, G>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    N: Notifier + 'static,
    G: ReportRenderer + 'static,
{
    let id = SubmissionId(submission_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record.result_view())).into_response(),
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "submission_id": id.0,
                "error": "submission not found",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
