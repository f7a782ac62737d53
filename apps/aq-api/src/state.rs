use std::sync::Arc;

use aq_service::{AnalogService, open_store};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AnalogService>,
}
impl AppState {
	pub async fn new(config: aq_config::Config) -> color_eyre::Result<Self> {
		let store = open_store(&config).await?;

		tracing::info!(source = store.source().as_str(), "Discovery store opened.");

		Ok(Self::from_service(AnalogService::new(config, store)))
	}

	pub fn from_service(service: AnalogService) -> Self {
		Self { service: Arc::new(service) }
	}
}
