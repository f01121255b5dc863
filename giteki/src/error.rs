use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitekiError {
    #[error("Extraction failed for {file}: {message}")]
    Extraction { file: String, message: String },

    #[error("Cannot list source directory {path}: {message}")]
    SourceDirectory { path: String, message: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store failure while importing {file}: {source}")]
    Store {
        file: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl GitekiError {
    /// Wrap any failure raised while extracting rows so that it names the file.
    pub fn extraction(file: impl Into<String>, message: impl std::fmt::Display) -> Self {
        GitekiError::Extraction {
            file: file.into(),
            message: message.to_string(),
        }
    }

    /// Attribute a store failure to the file being imported.
    pub fn in_file(self, file: &str) -> Self {
        match self {
            GitekiError::Sqlite(source) => GitekiError::Store {
                file: file.to_string(),
                source,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, GitekiError>;
