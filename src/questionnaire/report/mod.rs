mod document;
mod table;

pub use table::{parse_score_table, write_score_table, TableError, SCORE_TABLE_COLUMNS};

use super::access_code::AccessCode;
use super::classifier::{classify, ProfileClassification};
use super::radar::{project, RadarProjection};
use super::scoring::ScoreSheet;
use chrono::NaiveDateTime;
use serde::Serialize;

pub const DEFAULT_PATIENT: &str = "Patient";
pub const DISCLAIMER: &str =
    "Outil d'orientation clinique. Ce questionnaire n’est pas un diagnostic.";
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A completed questionnaire: immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub code: AccessCode,
    pub patient: String,
    pub created_at: NaiveDateTime,
    pub scores: ScoreSheet,
    pub classification: ProfileClassification,
}

impl Report {
    pub fn new(
        code: AccessCode,
        patient: &str,
        created_at: NaiveDateTime,
        scores: ScoreSheet,
    ) -> Self {
        let patient = match patient.trim() {
            "" => DEFAULT_PATIENT.to_string(),
            trimmed => trimmed.to_string(),
        };
        let classification = classify(&scores);

        Self {
            code,
            patient,
            created_at,
            scores,
            classification,
        }
    }

    /// Same report under another access code.
    pub fn with_code(self, code: AccessCode) -> Self {
        Self { code, ..self }
    }

    pub fn timestamp(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn radar(&self) -> RadarProjection {
        project(&self.scores)
    }

    pub fn chart_title(&self) -> String {
        format!("Profil en étoile – {}", self.patient)
    }

    pub fn to_markdown(&self) -> String {
        document::render_markdown(self)
    }

    pub fn score_table(&self) -> Result<String, TableError> {
        write_score_table(&self.scores)
    }
}
