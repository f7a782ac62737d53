use serde::{Deserialize, Serialize};

use aq_domain::{
	Discovery, DiscoveryFilter, DiscoveryPage, DiscoveryQuery, QueryParams, Rating, RecordSource,
	SortBy, SortOrder, engine,
};

use crate::{AnalogService, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryDetail {
	pub data: Discovery,
	pub metadata: DetailMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailMetadata {
	pub id: i64,
	pub has_editorial: bool,
	pub source: RecordSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedPage {
	pub data: Vec<Discovery>,
	pub metadata: FeaturedMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedMetadata {
	pub returned: usize,
	pub limit: usize,
	pub source: RecordSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
	CreateDiscovery,
	UpdateDiscovery,
	DeleteDiscovery,
	CreatePair,
}
impl WriteOperation {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::CreateDiscovery => "Creating discoveries",
			Self::UpdateDiscovery => "Updating discoveries",
			Self::DeleteDiscovery => "Deleting discoveries",
			Self::CreatePair => "Creating discovered pairs",
		}
	}
}

impl AnalogService {
	pub async fn list_discoveries(&self, params: &QueryParams) -> Result<DiscoveryPage> {
		let query = DiscoveryQuery::from_params(params).with_rating_tie_break(self.rating_tie_break());

		self.run_query(&query).await
	}

	pub async fn run_query(&self, query: &DiscoveryQuery) -> Result<DiscoveryPage> {
		let records = self.store.load(&query.filter).await?;
		let page = engine::run(&records, query, self.store.source());

		tracing::debug!(
			total = page.metadata.total,
			returned = page.metadata.returned,
			sort_by = query.sort_by.as_str(),
			order = query.order.as_str(),
			"Discovery listing served."
		);

		Ok(page)
	}

	pub async fn get_discovery(&self, id: i64) -> Result<DiscoveryDetail> {
		let Some(discovery) = self.store.get(id).await? else {
			return Err(Error::NotFound { message: format!("Discovery {id} does not exist.") });
		};

		Ok(DiscoveryDetail {
			metadata: DetailMetadata {
				id: discovery.id,
				has_editorial: discovery.has_editorial(),
				source: self.store.source(),
			},
			data: discovery,
		})
	}

	/// Highest-similarity `excellent` records. `None` uses `query.featured_limit`.
	pub async fn featured_discoveries(&self, limit: Option<usize>) -> Result<FeaturedPage> {
		let limit = limit.unwrap_or(self.cfg.query.featured_limit);
		let query = DiscoveryQuery {
			filter: DiscoveryFilter {
				rating: Some(Rating::Excellent.as_str().to_string()),
				..Default::default()
			},
			sort_by: SortBy::Similarity,
			order: SortOrder::Desc,
			limit: Some(limit),
			offset: 0,
			rating_tie_break: self.rating_tie_break(),
		};

		let page = self.run_query(&query).await?;

		Ok(FeaturedPage {
			metadata: FeaturedMetadata {
				returned: page.data.len(),
				limit,
				source: page.metadata.source,
			},
			data: page.data,
		})
	}

	pub fn reject_write(&self, operation: WriteOperation) -> Result<()> {
		tracing::info!(operation = operation.as_str(), "Rejected write against read-only catalog.");

		Err(Error::NotSupported { operation: operation.as_str().to_string() })
	}
}

pub fn parse_discovery_id(raw: &str) -> Result<i64> {
	raw.trim().parse::<i64>().map_err(|_| Error::InvalidInput {
		message: format!("Discovery id must be an integer, got {raw:?}."),
	})
}
