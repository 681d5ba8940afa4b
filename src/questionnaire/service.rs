use std::io::Read;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::access_code::AccessCode;
use super::classifier::{classify, ProfileClassification};
use super::error::ValidationError;
use super::notify::{DeliveryError, DeliveryStatus, Mailer, NotificationMessage};
use super::radar::{project, RadarProjection};
use super::report::{parse_score_table, Report, TableError};
use super::responses::RawResponses;
use super::scoring::{score_raw, ScoreSheet};
use super::storage::{ReportArtifacts, ReportStore, StoreError};

/// Fresh codes drawn before giving up on persisting a submission.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Payload of one completed questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireSubmission {
    #[serde(default)]
    pub patient: String,
    pub responses: RawResponses,
}

/// Scores with everything derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileEvaluation {
    pub scores: ScoreSheet,
    pub classification: ProfileClassification,
    pub radar: RadarProjection,
}

impl ProfileEvaluation {
    pub fn from_scores(scores: ScoreSheet) -> Self {
        let classification = classify(&scores);
        let radar = project(&scores);
        Self {
            scores,
            classification,
            radar,
        }
    }
}

/// Scores an imported `Dimension,Score,Max` table.
pub fn evaluate_score_table<R: Read>(reader: R) -> Result<ProfileEvaluation, TableError> {
    let scores = parse_score_table(reader)?;
    Ok(ProfileEvaluation::from_scores(scores))
}

#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub report: Report,
    pub radar: RadarProjection,
    /// False when every storage attempt failed; the report is still returned.
    pub persisted: bool,
    pub delivery: DeliveryStatus,
}

#[derive(Debug, Clone)]
pub struct RetrievedReport {
    pub code: AccessCode,
    pub evaluation: ProfileEvaluation,
    pub markdown: Option<String>,
    pub scores_csv: String,
    radar_svg: Option<String>,
}

impl RetrievedReport {
    /// Stored chart, or one re-rendered from the scores when it was not kept.
    pub fn radar_svg(&self) -> String {
        match &self.radar_svg {
            Some(svg) => svg.clone(),
            None => self
                .evaluation
                .radar
                .render_svg(&format!("Profil en étoile – {}", self.code)),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Retrieval {
    Found(Box<RetrievedReport>),
    NotFound { code: String },
}

/// Orchestrates scoring, persistence and notification for submissions, and
/// rebuilds reports from storage.
pub struct QuestionnaireService<S, M> {
    store: Arc<S>,
    mailer: Arc<M>,
}

impl<S, M> QuestionnaireService<S, M>
where
    S: ReportStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<S>, mailer: Arc<M>) -> Self {
        Self { store, mailer }
    }

    pub fn submit(
        &self,
        submission: QuestionnaireSubmission,
    ) -> Result<SubmissionOutcome, ServiceError> {
        self.submit_at(submission, Local::now().naive_local())
    }

    /// Scores and classifies, then persists and notifies on a best-effort
    /// basis. Only invalid responses fail the call.
    pub fn submit_at(
        &self,
        submission: QuestionnaireSubmission,
        created_at: NaiveDateTime,
    ) -> Result<SubmissionOutcome, ServiceError> {
        let scores = score_raw(&submission.responses)?;
        let report = Report::new(
            AccessCode::generate(),
            &submission.patient,
            created_at,
            scores,
        );

        let (report, persisted) = self.persist(report);
        let delivery = self.deliver(&report);

        info!(
            code = %report.code,
            persisted,
            delivered = delivery.is_sent(),
            labels = ?report.classification.labels(),
            "questionnaire submitted"
        );

        let radar = report.radar();
        Ok(SubmissionOutcome {
            report,
            radar,
            persisted,
            delivery,
        })
    }

    pub fn retrieve(&self, raw_code: &str) -> Result<Retrieval, ServiceError> {
        let Some(code) = AccessCode::parse(raw_code) else {
            return Ok(Retrieval::NotFound {
                code: raw_code.trim().to_string(),
            });
        };

        let Some(stored) = self.store.load(&code)? else {
            debug!(code = %code, "no report stored under code");
            return Ok(Retrieval::NotFound {
                code: code.to_string(),
            });
        };

        let evaluation = evaluate_score_table(stored.scores_csv.as_bytes()).map_err(|source| {
            ServiceError::CorruptReport {
                code: code.to_string(),
                source,
            }
        })?;

        Ok(Retrieval::Found(Box::new(RetrievedReport {
            code: stored.code,
            evaluation,
            markdown: stored.markdown,
            scores_csv: stored.scores_csv,
            radar_svg: stored.radar_svg,
        })))
    }

    fn persist(&self, mut report: Report) -> (Report, bool) {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let artifacts = match ReportArtifacts::from_report(&report) {
                Ok(artifacts) => artifacts,
                Err(error) => {
                    warn!(code = %report.code, %error, "failed to render report artifacts");
                    return (report, false);
                }
            };

            match self.store.save(&artifacts) {
                Ok(()) => return (report, true),
                Err(StoreError::Conflict) => {
                    warn!(code = %report.code, attempt, "access code collision, drawing a new one");
                    report = report.with_code(AccessCode::generate());
                }
                Err(error) => {
                    warn!(code = %report.code, %error, "report not persisted");
                    return (report, false);
                }
            }
        }

        warn!(
            code = %report.code,
            attempts = MAX_CODE_ATTEMPTS,
            "no free access code found, report not persisted"
        );
        (report, false)
    }

    fn deliver(&self, report: &Report) -> DeliveryStatus {
        let message = NotificationMessage::for_report(report);
        match self.mailer.send(&message) {
            Ok(()) => DeliveryStatus::Sent,
            Err(error) => {
                match &error {
                    DeliveryError::Configuration(_) => {
                        info!(code = %report.code, %error, "notification left for manual delivery")
                    }
                    DeliveryError::Transport(_) => {
                        warn!(code = %report.code, %error, "notification delivery failed")
                    }
                }
                DeliveryStatus::Manual {
                    reason: error.to_string(),
                    message,
                }
            }
        }
    }
}

/// Error raised by the questionnaire service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("stored report {code} is unreadable: {source}")]
    CorruptReport {
        code: String,
        #[source]
        source: TableError,
    },
}
