use thiserror::Error;

pub type StoresResult<T> = Result<T, StoresError>;

#[derive(Error, Debug)]
pub enum StoresError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The spreadsheet could not be read at all
    #[error("Spreadsheet parse error: {0}")]
    Parse(String),

    /// The workbook opened fine but contains no worksheet
    #[error("The file contains no worksheet")]
    NoWorksheet,

    /// Every data row was rejected (or there were none)
    #[error("No valid data found in the file ({skipped} rows skipped)")]
    NoValidData { skipped: usize },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
