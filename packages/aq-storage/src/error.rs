use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Failed to read data file at {path:?}.")]
	ReadFile { path: PathBuf, source: std::io::Error },
	#[error("Failed to parse data file at {path:?}.")]
	ParseFile { path: PathBuf, source: serde_json::Error },
}
