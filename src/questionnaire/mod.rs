//! Neurodiversity pre-questionnaire: the fixed 80-item catalog, scoring,
//! profile rules, radar geometry, and the report pipeline built around them.
//!
//! Everything from [`catalog`] through [`report`] is pure and synchronous.
//! Storage and mail delivery sit behind the [`ReportStore`] and [`Mailer`]
//! traits so the [`QuestionnaireService`] can be exercised without I/O.

pub mod access_code;
pub mod catalog;
pub mod classifier;
pub mod error;
mod normalizer;
pub mod notify;
pub mod radar;
pub mod report;
pub mod responses;
pub mod router;
pub mod scoring;
pub mod service;
pub mod storage;
pub mod views;

#[cfg(test)]
mod tests;

pub use access_code::AccessCode;
pub use catalog::{catalog, Dimension, DimensionId, ScalePoint, LIKERT_SCALE};
pub use classifier::{classify, ProfileClassification, ProfileFinding, ProfileLabel};
pub use error::ValidationError;
pub use notify::{DeliveryError, DeliveryStatus, Mailer, NotificationMessage, SmtpMailer};
pub use radar::{project, RadarProjection};
pub use report::{parse_score_table, write_score_table, Report, TableError};
pub use responses::{RawResponses, ResponseSet};
pub use router::questionnaire_router;
pub use scoring::{score_raw, score_responses, DimensionScore, ScoreSheet, MAX_DIMENSION_SCORE};
pub use service::{
    evaluate_score_table, ProfileEvaluation, QuestionnaireService, QuestionnaireSubmission,
    RetrievedReport, Retrieval, ServiceError, SubmissionOutcome,
};
pub use storage::{FileReportStore, ReportArtifacts, ReportStore, StoreError, StoredReport};
