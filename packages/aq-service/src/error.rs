pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Record store unavailable: {message}")]
	StoreUnavailable { message: String },
	#[error("{operation} is not supported.")]
	NotSupported { operation: String },
}
impl From<aq_storage::Error> for Error {
	fn from(err: aq_storage::Error) -> Self {
		tracing::error!(error = %err, "Record store failed.");

		Self::StoreUnavailable { message: "Discovery data is temporarily unavailable.".to_string() }
	}
}
