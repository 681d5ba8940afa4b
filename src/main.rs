use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use neuroprofile::config::AppConfig;
use neuroprofile::error::AppError;
use neuroprofile::questionnaire::{
    catalog, evaluate_score_table, questionnaire_router, score_raw, AccessCode, DeliveryStatus,
    FileReportStore, ProfileEvaluation, QuestionnaireService, QuestionnaireSubmission,
    RawResponses, Report, Retrieval, SmtpMailer, LIKERT_SCALE,
};
use neuroprofile::telemetry;
use serde::Deserialize;
use serde_json::json;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

type FileBackedService = QuestionnaireService<FileReportStore, SmtpMailer>;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "neuroprofile",
    about = "Score the neurodiversity pre-questionnaire and manage practitioner reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the dimensions, items and response scale
    Catalog,
    /// Score a responses file and print the report
    Score(ScoreArgs),
    /// Classify an exported Dimension,Score,Max table
    Classify(ClassifyArgs),
    /// Look up a stored report by access code
    Retrieve(RetrieveArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// JSON file with a submission or a bare {"D1": [..], ..} responses map
    #[arg(long)]
    responses: PathBuf,
    /// Patient identifier shown in the report
    #[arg(long)]
    patient: Option<String>,
    /// Persist the report and notify the practitioner
    #[arg(long)]
    save: bool,
    /// Write the radar chart to this SVG file
    #[arg(long)]
    svg: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// CSV file with Dimension, Score and Max columns
    #[arg(long)]
    scores: PathBuf,
}

#[derive(Args, Debug)]
struct RetrieveArgs {
    /// Access code printed at submission time
    #[arg(long)]
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponsesFile {
    Submission(QuestionnaireSubmission),
    Bare(RawResponses),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Catalog => {
            print_catalog();
            Ok(())
        }
        Command::Score(args) => run_score(args),
        Command::Classify(args) => run_classify(args),
        Command::Retrieve(args) => run_retrieve(args),
    }
}

fn file_backed_service(config: &AppConfig) -> FileBackedService {
    QuestionnaireService::new(
        Arc::new(FileReportStore::new(config.storage.reports_dir.clone())),
        Arc::new(SmtpMailer::new(config.mail.clone())),
    )
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let service = Arc::new(file_backed_service(&config));
    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(questionnaire_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        reports_dir = %config.storage.reports_dir.display(),
        "questionnaire service ready"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn load_submission(raw: &str, patient: Option<String>) -> Result<QuestionnaireSubmission, AppError> {
    let mut submission = match serde_json::from_str::<ResponsesFile>(raw)? {
        ResponsesFile::Submission(submission) => submission,
        ResponsesFile::Bare(responses) => QuestionnaireSubmission {
            patient: String::new(),
            responses,
        },
    };

    if let Some(patient) = patient {
        submission.patient = patient;
    }
    Ok(submission)
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        responses,
        patient,
        save,
        svg,
    } = args;

    let submission = load_submission(&fs::read_to_string(responses)?, patient)?;

    let report = if save {
        let config = AppConfig::load()?;
        let outcome = file_backed_service(&config).submit(submission)?;

        println!("{}", outcome.report.to_markdown());
        if outcome.persisted {
            println!(
                "Rapport enregistré sous le code {} dans {}",
                outcome.report.code,
                config.storage.reports_dir.display()
            );
        } else {
            println!("Le rapport n'a pas pu être enregistré.");
        }
        match &outcome.delivery {
            DeliveryStatus::Sent => println!("Notification envoyée au praticien."),
            DeliveryStatus::Manual { reason, message } => {
                println!("\nNotification non envoyée ({reason}). Message à transmettre :");
                println!("Objet : {}\n\n{}", message.subject, message.body);
            }
        }
        outcome.report
    } else {
        let scores = score_raw(&submission.responses)?;
        let report = Report::new(
            AccessCode::generate(),
            &submission.patient,
            Local::now().naive_local(),
            scores,
        );
        println!("{}", report.to_markdown());
        report
    };

    if let Some(path) = svg {
        fs::write(&path, report.radar().render_svg(&report.chart_title()))?;
        println!("Graphique radar écrit dans {}", path.display());
    }

    Ok(())
}

fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let evaluation = evaluate_score_table(File::open(args.scores)?)?;
    render_evaluation(&evaluation);
    Ok(())
}

fn run_retrieve(args: RetrieveArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    match file_backed_service(&config).retrieve(&args.code)? {
        Retrieval::Found(report) => {
            println!("Rapport {}", report.code);
            render_evaluation(&report.evaluation);
            if let Some(markdown) = &report.markdown {
                println!("\n{markdown}");
            }
        }
        Retrieval::NotFound { code } => {
            println!("Aucun rapport trouvé pour le code '{code}'.");
        }
    }
    Ok(())
}

fn print_catalog() {
    let scale = LIKERT_SCALE
        .iter()
        .map(|point| format!("{}={}", point.value, point.label))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Échelle : {scale}");

    for dimension in catalog() {
        println!("\n{}", dimension.label);
        for (index, item) in dimension.items.iter().enumerate() {
            println!("{:>2}. {item}", index + 1);
        }
    }
}

fn render_evaluation(evaluation: &ProfileEvaluation) {
    println!("\nScores par dimension");
    for score in &evaluation.scores {
        println!("- {} : {}/{}", score.label(), score.score, score.max);
    }

    println!("\nProfil suggéré");
    for finding in evaluation.classification.findings() {
        match &finding.criterion {
            Some(criterion) => println!("- {} [{criterion}]", finding.label.summary()),
            None => println!("- {}", finding.label.summary()),
        }
    }

    println!("\n{}", evaluation.radar.score_line());
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_responses(value: u8) -> String {
        let map: serde_json::Map<String, serde_json::Value> = (1..=8)
            .map(|index| (format!("D{index}"), json!(vec![value; 10])))
            .collect();
        serde_json::Value::Object(map).to_string()
    }

    #[test]
    fn load_submission_accepts_bare_response_maps() {
        let submission =
            load_submission(&uniform_responses(2), Some("Dossier 12".to_string()))
                .expect("bare map parses");
        assert_eq!(submission.patient, "Dossier 12");
        assert_eq!(submission.responses.len(), 8);
    }

    #[test]
    fn load_submission_accepts_full_submissions() {
        let raw = format!(
            "{{\"patient\": \"Dossier 7\", \"responses\": {}}}",
            uniform_responses(1)
        );
        let submission = load_submission(&raw, None).expect("submission parses");
        assert_eq!(submission.patient, "Dossier 7");

        let overridden = load_submission(&raw, Some("Autre".to_string())).expect("parses");
        assert_eq!(overridden.patient, "Autre");
    }

    #[test]
    fn load_submission_rejects_malformed_json() {
        assert!(matches!(
            load_submission("[1, 2", None),
            Err(AppError::Json(_))
        ));
    }

    #[test]
    fn score_save_persists_despite_malformed_mail_settings() {
        let dir = tempfile::tempdir().expect("temp dir");
        let responses = dir.path().join("responses.json");
        fs::write(&responses, uniform_responses(3)).expect("responses written");
        let reports = dir.path().join("reports");

        std::env::set_var("APP_REPORTS_DIR", &reports);
        std::env::set_var("SMTP_PORT", "abc");
        std::env::set_var("SMTP_TIMEOUT_SECS", "x");
        let result = run_score(ScoreArgs {
            responses,
            patient: Some("Dossier 5".to_string()),
            save: true,
            svg: None,
        });
        for key in ["APP_REPORTS_DIR", "SMTP_PORT", "SMTP_TIMEOUT_SECS"] {
            std::env::remove_var(key);
        }

        result.expect("mail misconfiguration does not abort the submission");
        let written = fs::read_dir(&reports).expect("reports dir created").count();
        assert_eq!(written, 3);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
