use thiserror::Error;

/// Result type for loading, broadening and rendering.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between reading a table and writing a chart.
///
/// All failures are deterministic data-validity failures; nothing here is
/// worth retrying.
#[derive(Debug, Error)]
pub enum Error {
    /// No excitation lines were supplied.
    #[error("no excitation lines supplied")]
    EmptyInput,

    /// A numeric parameter (sigma, resolution, bounds, line values) is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unit string other than `eV` or `nm`.
    #[error("unsupported unit '{0}' (expected \"eV\" or \"nm\")")]
    UnsupportedUnit(String),

    /// The input table could not be parsed.
    #[error("{}", malformed_message(.row, .message))]
    MalformedInput {
        /// 1-based data row, when the problem is tied to one.
        row: Option<usize>,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The chart backend failed to draw or write.
    #[error("render error: {0}")]
    Render(String),
}

fn malformed_message(row: &Option<usize>, message: &str) -> String {
    match row {
        Some(row) => format!("malformed input at row {row}: {message}"),
        None => format!("malformed input: {message}"),
    }
}

impl Error {
    pub fn malformed(row: Option<usize>, message: impl Into<String>) -> Self {
        Error::MalformedInput {
            row,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidParameter(message.into())
    }
}
