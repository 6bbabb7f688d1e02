use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    /// Source unreadable, or a row that cannot be turned into a typed record.
    #[error("load error in {source_name}: {message}")]
    Load {
        source_name: String,
        message: String,
    },

    #[error("schema error in {source_name}: missing required column `{column}`")]
    Schema {
        source_name: String,
        column: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("boundary fetch failed: {0}")]
    Fetch(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    pub fn load(source_name: &str, message: impl Into<String>) -> Self {
        DashError::Load {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    /// Error for a specific data row. `row` is 1-based and excludes the header.
    pub fn bad_row(source_name: &str, row: usize, message: impl std::fmt::Display) -> Self {
        DashError::load(source_name, format!("row {}: {}", row, message))
    }

    pub fn schema(source_name: &str, column: &str) -> Self {
        DashError::Schema {
            source_name: source_name.to_string(),
            column: column.to_string(),
        }
    }
}

impl From<reqwest::Error> for DashError {
    fn from(e: reqwest::Error) -> Self {
        DashError::Fetch(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
