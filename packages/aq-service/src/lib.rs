pub mod discoveries;
pub mod overview;
pub mod pairs;
pub mod store;

mod error;
mod normalize;

pub use aq_storage::models::PairRecord;
pub use discoveries::{
	DetailMetadata, DiscoveryDetail, FeaturedMetadata, FeaturedPage, WriteOperation,
	parse_discovery_id,
};
pub use error::{Error, Result};
pub use overview::{Capabilities, CatalogOverview, RatingCounts};
pub use pairs::{PairFilter, PairPage, PairPageMetadata, PairParams, PairQuery, PairStats};
pub use store::{PgStore, StaticStore, open_store};

use std::{future::Future, pin::Pin, sync::Arc};

use aq_config::Config;
use aq_domain::{Discovery, DiscoveryFilter, RatingTieBreak, RecordSource};
use serde_json::{Map, Value};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read access to the canonical discovery collection.
///
/// Implementations return records that already satisfy the canonical invariants. `load` may
/// narrow by the filter but is not required to; callers reapply it.
pub trait DiscoveryStore
where
	Self: Send + Sync,
{
	fn source(&self) -> RecordSource;

	fn load<'a>(&'a self, filter: &'a DiscoveryFilter) -> BoxFuture<'a, Result<Vec<Discovery>>>;

	fn get<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Discovery>>>;

	fn pairs<'a>(&'a self, filter: &'a PairFilter) -> BoxFuture<'a, Result<Vec<PairRecord>>>;

	fn unique_pair_count<'a>(&'a self) -> BoxFuture<'a, Result<usize>>;

	/// Provenance fields echoed into pair listings.
	fn pair_metadata(&self) -> Map<String, Value> {
		Map::new()
	}

	/// Releases backend resources once the server has stopped.
	fn close<'a>(&'a self) -> BoxFuture<'a, ()> {
		Box::pin(async {})
	}
}

pub struct AnalogService {
	pub cfg: Config,
	pub store: Arc<dyn DiscoveryStore>,
}
impl AnalogService {
	pub fn new(cfg: Config, store: Arc<dyn DiscoveryStore>) -> Self {
		Self { cfg, store }
	}

	pub async fn close(&self) {
		self.store.close().await;

		tracing::info!(source = self.store.source().as_str(), "Discovery store closed.");
	}

	pub(crate) fn rating_tie_break(&self) -> RatingTieBreak {
		self.cfg.query.rating_tie_break
	}
}
