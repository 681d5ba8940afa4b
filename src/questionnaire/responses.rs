use super::catalog::{
    DimensionId, DIMENSION_COUNT, ITEMS_PER_DIMENSION, LIKERT_MAX, LIKERT_MIN,
};
use super::error::ValidationError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Responses as received from a form or an uploaded file: dimension key to the
/// list of answers, each still an arbitrary JSON value.
pub type RawResponses = BTreeMap<String, Vec<Value>>;

/// A complete, validated set of 80 answers on the 0-4 scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSet {
    values: [[u8; ITEMS_PER_DIMENSION]; DIMENSION_COUNT],
}

impl ResponseSet {
    /// Validates untyped input. Keys may be stable codes or dimension labels.
    pub fn from_raw(raw: &RawResponses) -> Result<Self, ValidationError> {
        let mut resolved = BTreeMap::new();

        for (key, answers) in raw {
            let dimension =
                DimensionId::resolve(key).ok_or_else(|| ValidationError::UnknownDimension {
                    key: key.clone(),
                })?;

            let integers = answers
                .iter()
                .enumerate()
                .map(|(index, answer)| integer_answer(dimension, index + 1, answer))
                .collect::<Result<Vec<_>, _>>()?;

            if resolved.insert(dimension, integers).is_some() {
                return Err(ValidationError::DuplicateDimension { dimension });
            }
        }

        Self::from_integers(&resolved)
    }

    /// Validates answers that are already integers.
    pub fn from_integers(
        answers: &BTreeMap<DimensionId, Vec<i64>>,
    ) -> Result<Self, ValidationError> {
        let mut values = [[LIKERT_MIN; ITEMS_PER_DIMENSION]; DIMENSION_COUNT];

        for dimension in DimensionId::ordered() {
            let provided = answers
                .get(&dimension)
                .ok_or(ValidationError::MissingDimension { dimension })?;

            let expected = dimension.dimension().item_count();
            if provided.len() != expected {
                return Err(ValidationError::ItemCount {
                    dimension,
                    expected,
                    actual: provided.len(),
                });
            }

            for (index, &value) in provided.iter().enumerate() {
                values[dimension.index()][index] = likert_value(dimension, index + 1, value)?;
            }
        }

        Ok(Self { values })
    }

    pub fn answers(&self, dimension: DimensionId) -> &[u8; ITEMS_PER_DIMENSION] {
        &self.values[dimension.index()]
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (DimensionId, &[u8; ITEMS_PER_DIMENSION])> + '_ {
        DimensionId::ordered()
            .into_iter()
            .map(move |dimension| (dimension, self.answers(dimension)))
    }
}

fn integer_answer(
    dimension: DimensionId,
    item: usize,
    answer: &Value,
) -> Result<i64, ValidationError> {
    match (answer.as_i64(), answer.as_u64()) {
        (Some(value), _) => Ok(value),
        // Integers beyond i64 are still integers, just far out of range.
        (None, Some(value)) => Err(ValidationError::ResponseOutOfRange {
            dimension,
            item,
            value: i128::from(value),
        }),
        (None, None) => Err(ValidationError::NonIntegerResponse {
            dimension,
            item,
            raw: answer.to_string(),
        }),
    }
}

fn likert_value(dimension: DimensionId, item: usize, value: i64) -> Result<u8, ValidationError> {
    if value < i64::from(LIKERT_MIN) || value > i64::from(LIKERT_MAX) {
        return Err(ValidationError::ResponseOutOfRange {
            dimension,
            item,
            value: i128::from(value),
        });
    }
    // In range, so the narrowing cannot truncate.
    Ok(value as u8)
}
