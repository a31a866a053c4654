use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeepDiveError {
    #[error("Missing column: {0}")]
    MissingField(String),

    #[error("Bad currency value {value:?} in column '{column}' at row {row}")]
    Format {
        column: String,
        row: usize,
        value: String,
    },

    #[error("No rows left after {0}")]
    EmptyResult(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Staging error: {0}")]
    Staging(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

pub type Result<T> = std::result::Result<T, DeepDiveError>;
