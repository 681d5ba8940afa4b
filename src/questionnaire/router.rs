use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::notify::Mailer;
use super::service::{
    evaluate_score_table, QuestionnaireService, QuestionnaireSubmission, RetrievedReport,
    Retrieval, ServiceError,
};
use super::storage::ReportStore;
use super::views::{CatalogView, EvaluationView, RetrievalView, SubmissionView};

/// Router builder exposing the questionnaire, submission and report endpoints.
pub fn questionnaire_router<S, M>(service: Arc<QuestionnaireService<S, M>>) -> Router
where
    S: ReportStore + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route("/api/v1/questionnaire", get(catalog_handler))
        .route(
            "/api/v1/questionnaire/submissions",
            post(submit_handler::<S, M>),
        )
        .route("/api/v1/reports/:code", get(report_handler::<S, M>))
        .route(
            "/api/v1/reports/:code/scores.csv",
            get(scores_csv_handler::<S, M>),
        )
        .route(
            "/api/v1/reports/:code/radar.svg",
            get(radar_svg_handler::<S, M>),
        )
        .route("/api/v1/scores/classify", post(classify_handler))
        .with_state(service)
}

pub(crate) async fn catalog_handler() -> Response {
    (StatusCode::OK, axum::Json(CatalogView::current())).into_response()
}

pub(crate) async fn submit_handler<S, M>(
    State(service): State<Arc<QuestionnaireService<S, M>>>,
    axum::Json(submission): axum::Json<QuestionnaireSubmission>,
) -> Response
where
    S: ReportStore + 'static,
    M: Mailer + 'static,
{
    // Storage and SMTP block; keep them off the async workers.
    let outcome = tokio::task::spawn_blocking(move || service.submit(submission)).await;

    match outcome {
        Ok(Ok(outcome)) => {
            let view = SubmissionView::from(&outcome);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Ok(Err(error)) => service_error_response(error),
        Err(join_error) => {
            error!(%join_error, "submission task aborted");
            let payload = json!({ "error": "submission could not be processed" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn report_handler<S, M>(
    State(service): State<Arc<QuestionnaireService<S, M>>>,
    Path(code): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    M: Mailer + 'static,
{
    with_report(service, code, |report| {
        (StatusCode::OK, axum::Json(RetrievalView::from(report))).into_response()
    })
    .await
}

pub(crate) async fn scores_csv_handler<S, M>(
    State(service): State<Arc<QuestionnaireService<S, M>>>,
    Path(code): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    M: Mailer + 'static,
{
    with_report(service, code, |report| {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.as_ref())],
            report.scores_csv.clone(),
        )
            .into_response()
    })
    .await
}

pub(crate) async fn radar_svg_handler<S, M>(
    State(service): State<Arc<QuestionnaireService<S, M>>>,
    Path(code): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    M: Mailer + 'static,
{
    with_report(service, code, |report| {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime::IMAGE_SVG.as_ref())],
            report.radar_svg(),
        )
            .into_response()
    })
    .await
}

pub(crate) async fn classify_handler(body: String) -> Response {
    match evaluate_score_table(body.as_bytes()) {
        Ok(evaluation) => {
            (StatusCode::OK, axum::Json(EvaluationView::from(&evaluation))).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

async fn with_report<S, M>(
    service: Arc<QuestionnaireService<S, M>>,
    code: String,
    render: impl FnOnce(&RetrievedReport) -> Response,
) -> Response
where
    S: ReportStore + 'static,
    M: Mailer + 'static,
{
    // Reading the store blocks, same as submission.
    let retrieval = tokio::task::spawn_blocking(move || service.retrieve(&code)).await;

    match retrieval {
        Ok(Ok(Retrieval::Found(report))) => render(&report),
        Ok(Ok(Retrieval::NotFound { code })) => {
            let payload = json!({
                "error": "report not found",
                "code": code,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Ok(Err(error)) => service_error_response(error),
        Err(join_error) => {
            error!(%join_error, "retrieval task aborted");
            let payload = json!({ "error": "report could not be loaded" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn service_error_response(error: ServiceError) -> Response {
    match error {
        ServiceError::Validation(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "questionnaire request failed");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
