use crate::questionnaire::catalog::DimensionId;
use crate::questionnaire::error::ValidationError;
use crate::questionnaire::scoring::{ScoreSheet, MAX_DIMENSION_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Header of the `Dimension,Score,Max` interchange table.
pub const SCORE_TABLE_COLUMNS: [&str; 3] = ["Dimension", "Score", "Max"];

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("invalid score table CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("score table is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct ScoreRowOut<'a> {
    #[serde(rename = "Dimension")]
    dimension: &'a str,
    #[serde(rename = "Score")]
    score: u8,
    #[serde(rename = "Max")]
    max: u8,
}

#[derive(Debug, Deserialize)]
struct ScoreRowIn {
    #[serde(rename = "Dimension")]
    dimension: String,
    #[serde(rename = "Score")]
    score: String,
    #[serde(rename = "Max")]
    max: String,
}

/// Serializes the totals as CSV, one row per dimension in catalog order.
pub fn write_score_table(sheet: &ScoreSheet) -> Result<String, TableError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for score in sheet {
        writer.serialize(ScoreRowOut {
            dimension: score.label(),
            score: score.score,
            max: score.max,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| TableError::Csv(err.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Reads an interchange table back into a score sheet.
///
/// The header must carry all three columns; extra columns are ignored. Labels
/// match in any accent/apostrophe spelling, or by bare code (`D3`).
pub fn parse_score_table<R: Read>(reader: R) -> Result<ScoreSheet, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in SCORE_TABLE_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(ValidationError::MissingColumn { column }.into());
        }
    }

    let mut totals = BTreeMap::new();
    for (index, record) in csv_reader.deserialize::<ScoreRowIn>().enumerate() {
        let row = record?;
        let row_number = index + 1;

        let dimension = DimensionId::resolve(&row.dimension).ok_or_else(|| {
            ValidationError::UnknownDimensionLabel {
                row: row_number,
                label: row.dimension.clone(),
            }
        })?;

        let score = integer_cell(&row.score, row_number, "Score")?;
        let max = integer_cell(&row.max, row_number, "Max")?;
        if max != i64::from(MAX_DIMENSION_SCORE) {
            return Err(ValidationError::UnexpectedMaximum {
                dimension,
                expected: MAX_DIMENSION_SCORE,
                actual: max,
            }
            .into());
        }

        if totals.insert(dimension, score).is_some() {
            return Err(ValidationError::DuplicateDimension { dimension }.into());
        }
    }

    Ok(ScoreSheet::from_totals(&totals)?)
}

fn integer_cell(raw: &str, row: usize, column: &'static str) -> Result<i64, ValidationError> {
    raw.parse::<i64>()
        .map_err(|_| ValidationError::NonNumericCell {
            row,
            column,
            raw: raw.to_string(),
        })
}
