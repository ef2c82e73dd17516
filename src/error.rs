use thiserror::Error;

/// Errors raised by direct grid access.
///
/// Coordinates coming from the rendered inputs are always in range, so this
/// only shows up when a caller builds an address by hand.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Reasons a URL fragment could not be turned back into a grid.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("fragment is not valid percent-encoded UTF-8: {0}")]
    Percent(#[from] std::string::FromUtf8Error),

    #[error("malformed percent escape at byte {position}")]
    MalformedEscape { position: usize },

    #[error("fragment does not contain valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of {expected} rows, found {found}")]
    Shape { expected: usize, found: String },
}

/// Failure to parse a human-facing cell name such as `C4`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("'{0}' is not a cell name")]
    Malformed(String),

    #[error("'{0}' is outside the grid")]
    OutOfRange(String),
}
