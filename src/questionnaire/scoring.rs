use super::catalog::{DimensionId, DIMENSION_COUNT, ITEMS_PER_DIMENSION, LIKERT_MAX};
use super::error::ValidationError;
use super::responses::{RawResponses, ResponseSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Ceiling of every dimension total (10 items answered 4).
pub const MAX_DIMENSION_SCORE: u8 = 40;

// Re-derive MAX_DIMENSION_SCORE if the catalog shape changes.
const _: () = assert!(ITEMS_PER_DIMENSION * LIKERT_MAX as usize == MAX_DIMENSION_SCORE as usize);

/// Total of one dimension's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionScore {
    pub dimension: DimensionId,
    pub score: u8,
    pub max: u8,
}

impl DimensionScore {
    fn empty(dimension: DimensionId) -> Self {
        Self {
            dimension,
            score: 0,
            max: MAX_DIMENSION_SCORE,
        }
    }

    /// Score normalized to [0, 1].
    pub fn ratio(&self) -> f64 {
        f64::from(self.score) / f64::from(self.max)
    }

    pub fn label(&self) -> &'static str {
        self.dimension.label()
    }
}

/// The eight dimension totals in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoreSheet {
    scores: [DimensionScore; DIMENSION_COUNT],
}

impl ScoreSheet {
    /// Builds a sheet from totals obtained elsewhere (an imported score table).
    /// Every dimension must be present and within 0-40.
    pub fn from_totals(totals: &BTreeMap<DimensionId, i64>) -> Result<Self, ValidationError> {
        let mut scores = DimensionId::ordered().map(DimensionScore::empty);

        for slot in scores.iter_mut() {
            let dimension = slot.dimension;
            let total = *totals
                .get(&dimension)
                .ok_or(ValidationError::MissingDimension { dimension })?;

            slot.score = u8::try_from(total)
                .ok()
                .filter(|score| *score <= MAX_DIMENSION_SCORE)
                .ok_or(ValidationError::ScoreOutOfRange {
                    dimension,
                    score: total,
                    max: MAX_DIMENSION_SCORE,
                })?;
        }

        Ok(Self { scores })
    }

    pub fn score(&self, dimension: DimensionId) -> u8 {
        self.scores[dimension.index()].score
    }

    pub fn get(&self, dimension: DimensionId) -> &DimensionScore {
        &self.scores[dimension.index()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DimensionScore> {
        self.scores.iter()
    }

    pub fn as_slice(&self) -> &[DimensionScore] {
        &self.scores
    }
}

impl<'a> IntoIterator for &'a ScoreSheet {
    type Item = &'a DimensionScore;
    type IntoIter = std::slice::Iter<'a, DimensionScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sums each dimension's answers. Infallible for a validated response set.
pub fn score_responses(responses: &ResponseSet) -> ScoreSheet {
    let scores = DimensionId::ordered().map(|dimension| DimensionScore {
        dimension,
        score: responses.answers(dimension).iter().sum(),
        max: MAX_DIMENSION_SCORE,
    });
    ScoreSheet { scores }
}

/// Validates then scores untyped responses; nothing is scored when validation fails.
pub fn score_raw(raw: &RawResponses) -> Result<ScoreSheet, ValidationError> {
    let responses = ResponseSet::from_raw(raw)?;
    Ok(score_responses(&responses))
}
