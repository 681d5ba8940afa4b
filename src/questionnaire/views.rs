use serde::Serialize;

use super::catalog::{catalog, Dimension, DimensionId, ScalePoint, LIKERT_SCALE};
use super::classifier::{ProfileClassification, ProfileFinding};
use super::notify::DeliveryStatus;
use super::radar::RadarProjection;
use super::scoring::{DimensionScore, ScoreSheet};
use super::service::{ProfileEvaluation, RetrievedReport, SubmissionOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct ScoreView {
    pub dimension: DimensionId,
    pub label: &'static str,
    pub score: u8,
    pub max: u8,
}

impl From<&DimensionScore> for ScoreView {
    fn from(score: &DimensionScore) -> Self {
        Self {
            dimension: score.dimension,
            label: score.label(),
            score: score.score,
            max: score.max,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelView {
    pub code: &'static str,
    pub title: &'static str,
    pub explanation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criterion: Option<String>,
}

impl From<&ProfileFinding> for LabelView {
    fn from(finding: &ProfileFinding) -> Self {
        Self {
            code: finding.label.code(),
            title: finding.label.title(),
            explanation: finding.label.explanation(),
            criterion: finding.criterion.clone(),
        }
    }
}

fn score_views(scores: &ScoreSheet) -> Vec<ScoreView> {
    scores.iter().map(ScoreView::from).collect()
}

fn label_views(classification: &ProfileClassification) -> Vec<LabelView> {
    classification
        .findings()
        .iter()
        .map(LabelView::from)
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationView {
    pub scores: Vec<ScoreView>,
    pub labels: Vec<LabelView>,
    pub radar: RadarProjection,
}

impl From<&ProfileEvaluation> for EvaluationView {
    fn from(evaluation: &ProfileEvaluation) -> Self {
        Self {
            scores: score_views(&evaluation.scores),
            labels: label_views(&evaluation.classification),
            radar: evaluation.radar.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub code: String,
    pub patient: String,
    pub created_at: String,
    pub scores: Vec<ScoreView>,
    pub labels: Vec<LabelView>,
    pub radar: RadarProjection,
    pub persisted: bool,
    pub delivery: DeliveryStatus,
}

impl From<&SubmissionOutcome> for SubmissionView {
    fn from(outcome: &SubmissionOutcome) -> Self {
        let report = &outcome.report;
        Self {
            code: report.code.to_string(),
            patient: report.patient.clone(),
            created_at: report.timestamp(),
            scores: score_views(&report.scores),
            labels: label_views(&report.classification),
            radar: outcome.radar.clone(),
            persisted: outcome.persisted,
            delivery: outcome.delivery.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievalView {
    pub code: String,
    #[serde(flatten)]
    pub evaluation: EvaluationView,
    pub markdown: Option<String>,
}

impl From<&RetrievedReport> for RetrievalView {
    fn from(report: &RetrievedReport) -> Self {
        Self {
            code: report.code.to_string(),
            evaluation: EvaluationView::from(&report.evaluation),
            markdown: report.markdown.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub dimensions: &'static [Dimension],
    pub scale: &'static [ScalePoint],
}

impl CatalogView {
    pub fn current() -> Self {
        Self {
            dimensions: catalog(),
            scale: &LIKERT_SCALE,
        }
    }
}
