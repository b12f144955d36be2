use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApidocError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no package.json in package {}", package.display())]
    MissingManifest { package: PathBuf },
    #[error("invalid package manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },
    #[error("invalid package settings {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },
    #[error("invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("extractor failed on {}: {message}", file.display())]
    Extraction { file: PathBuf, message: String },
    #[error("unreadable record stream for {}: {message}", file.display())]
    RecordStream { file: PathBuf, message: String },
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("package {package} would overwrite {}", artifact.display())]
    ArtifactCollision { package: String, artifact: PathBuf },
    #[error("template error: {message}")]
    Template { message: String },
    #[error("prefilter error: {message}")]
    Prefilter { message: String },
}

pub type Result<T> = std::result::Result<T, ApidocError>;
