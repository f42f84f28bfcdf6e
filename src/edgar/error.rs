use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, EdgarError>;

/// Failures of a filing index lookup. Page and row numbers are 0-based.
#[derive(Debug, thiserror::Error)]
pub enum EdgarError {
    #[error("search request at offset {start} failed: {source}")]
    Http {
        start: usize,
        #[source]
        source: reqwest::Error,
    },

    #[error("search request at offset {start} returned HTTP {status}")]
    Status { status: StatusCode, start: usize },

    #[error("unexpected page layout on page {page}: {reason}")]
    UnexpectedLayout { page: usize, reason: String },

    #[error("no accession number in description (page {page}, row {row})")]
    MissingAccessionNumber { page: usize, row: usize },

    #[error("malformed accession number `{value}` (page {page}, row {row})")]
    MalformedAccessionNumber {
        page: usize,
        row: usize,
        value: String,
    },

    #[error("could not resolve ticker `{ticker}` to a CIK (found `{found}`)")]
    ResolutionFailed { ticker: String, found: String },

    #[error("search did not finish within {limit} pages")]
    PageLimitExceeded { limit: usize },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EdgarError {
    pub(crate) fn layout(page: usize, reason: impl Into<String>) -> Self {
        EdgarError::UnexpectedLayout {
            page,
            reason: reason.into(),
        }
    }

    /// Attaches the position to errors raised by position-agnostic parsers.
    pub(crate) fn at(self, page: usize, row: usize) -> Self {
        match self {
            EdgarError::UnexpectedLayout { reason, .. } => {
                EdgarError::UnexpectedLayout { page, reason }
            }
            EdgarError::MissingAccessionNumber { .. } => {
                EdgarError::MissingAccessionNumber { page, row }
            }
            EdgarError::MalformedAccessionNumber { value, .. } => {
                EdgarError::MalformedAccessionNumber { page, row, value }
            }
            other => other,
        }
    }
}
