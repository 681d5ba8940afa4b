use super::catalog::DimensionId;

/// Rejection of malformed questionnaire input. Raised before any scoring happens,
/// so a failed submission never yields a partial report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown dimension '{key}'")]
    UnknownDimension { key: String },
    #[error("missing responses for {dimension}")]
    MissingDimension { dimension: DimensionId },
    #[error("{dimension} appears more than once")]
    DuplicateDimension { dimension: DimensionId },
    #[error("{dimension} expects {expected} responses, received {actual}")]
    ItemCount {
        dimension: DimensionId,
        expected: usize,
        actual: usize,
    },
    #[error("{dimension} item {item}: response {value} is outside the 0-4 scale")]
    ResponseOutOfRange {
        dimension: DimensionId,
        item: usize,
        /// Wide enough for any JSON integer, signed or not.
        value: i128,
    },
    #[error("{dimension} item {item}: response '{raw}' is not an integer")]
    NonIntegerResponse {
        dimension: DimensionId,
        item: usize,
        raw: String,
    },
    #[error("score table is missing the '{column}' column")]
    MissingColumn { column: &'static str },
    #[error("score table row {row}: unknown dimension '{label}'")]
    UnknownDimensionLabel { row: usize, label: String },
    #[error("score table row {row}: {column} value '{raw}' is not an integer")]
    NonNumericCell {
        row: usize,
        column: &'static str,
        raw: String,
    },
    #[error("{dimension}: score {score} is outside 0-{max}")]
    ScoreOutOfRange {
        dimension: DimensionId,
        score: i64,
        max: u8,
    },
    #[error("{dimension}: maximum must be {expected}, table declares {actual}")]
    UnexpectedMaximum {
        dimension: DimensionId,
        expected: u8,
        actual: i64,
    },
}
