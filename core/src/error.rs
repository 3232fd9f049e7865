use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Access denied to database '{path}': check file permissions")]
    AccessDenied { path: String },

    #[error("Database '{path}' does not exist")]
    DatabaseMissing { path: String },

    #[error("Column '{label}' not found in header row")]
    MissingColumn { label: String },

    #[error("Row {row} has {found} cells, expected at least {needed}")]
    ShortRow {
        row: usize,
        needed: usize,
        found: usize,
    },

    #[error("Row {row}: {field} is blank")]
    BlankKey { row: usize, field: &'static str },

    #[error("Sheet has no header row")]
    EmptySheet,

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
