use thiserror::Error;

/// Failures raised by the comparator and the renderer.
///
/// Public functions return `anyhow::Result`; match on a specific failure with
/// `err.downcast_ref::<MetroplotError>()`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetroplotError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("column {0} already exists")]
    DuplicateColumn(String),
    #[error("column {name} has {actual} rows, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("column {column} has a missing or non-finite value at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("factor {factor} needs at least 2 distinct levels, found {found}")]
    TooFewLevels { factor: String, found: usize },
    #[error("level {0} has no observations")]
    EmptyLevel(String),
    #[error("not enough observations to compare {level1} and {level2}")]
    InsufficientObservations { level1: String, level2: String },
    #[error("t-test moments are not finite (mean difference {mean_diff}, standard error {std_err})")]
    NonFiniteMoments { mean_diff: f64, std_err: f64 },
    #[error("alpha must lie in (0, 1), got {0}")]
    InvalidAlpha(f64),
    #[error("level_axis must be x or y, got {0}")]
    InvalidLevelAxis(String),
    #[error("dominating effect direction must be -1 or 1")]
    InvalidDominanceDirection,
    #[error("palette has no color for level {0}")]
    MissingColor(String),
    #[error("invalid color: {0}")]
    InvalidColor(String),
}
