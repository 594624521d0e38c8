use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("Failed to access {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid entry filename {file_name}: {reason}")]
    Parse { file_name: String, reason: String },
    #[error("Analysis failed for {subject}: {reason}")]
    Analysis { subject: String, reason: String },
}

impl JournalError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
