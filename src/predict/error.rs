use thiserror::Error;

#[derive(Debug, Error)]
pub enum TleError {
    #[error("expected 2 or 3 non-empty lines, found {0}")]
    LineCount(usize),
    #[error("satellite name longer than 24 characters: {0:?}")]
    NameTooLong(String),
    #[error("line {line}: expected 69 columns, found {found}")]
    LineLength { line: u8, found: usize },
    #[error("line {line}: must start with \"{line} \"")]
    LineNumber { line: u8 },
    #[error("line {line}: checksum mismatch (expected {expected}, computed {computed})")]
    Checksum { line: u8, expected: u32, computed: u32 },
    #[error("catalog numbers differ between lines ({0} vs {1})")]
    CatalogMismatch(String, String),
    #[error("invalid elements: {0}")]
    Elements(#[from] sgp4::TleError),
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid tle: {0}")]
    Tle(#[from] TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("propagation error: {0}")]
    Propagation(String),
}

impl From<sgp4::Error> for PredictError {
    fn from(err: sgp4::Error) -> Self {
        PredictError::Propagation(err.to_string())
    }
}
