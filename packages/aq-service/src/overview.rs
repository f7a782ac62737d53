use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use aq_domain::{DiscoveryFilter, DiscoveryStats, DomainPairCount, RecordSource, SimilarityStats};

use crate::{AnalogService, Result};

pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCounts {
	pub excellent: usize,
	pub good: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
	pub filtering: bool,
	pub sorting: bool,
	pub pagination: bool,
	pub writing: bool,
	pub database: bool,
}

/// Whole-collection summary, independent of any request filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogOverview {
	pub total_discoveries: usize,
	pub unique_pairs: usize,
	pub ratings: RatingCounts,
	pub similarity_range: SimilarityStats,
	pub domains: Vec<String>,
	/// Records without a session count as session 0.
	pub sessions: Vec<i64>,
	pub domain_pairs: Vec<DomainPairCount>,
	pub api_version: String,
	pub capabilities: Capabilities,
	pub source: RecordSource,
}

impl AnalogService {
	pub async fn catalog_overview(&self) -> Result<CatalogOverview> {
		let records = self.store.load(&DiscoveryFilter::default()).await?;
		let unique_pairs = self.store.unique_pair_count().await?;
		let stats = DiscoveryStats::compute(records.iter());
		let sessions = records
			.iter()
			.map(|discovery| discovery.session_or_zero())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect();
		let source = self.store.source();

		Ok(CatalogOverview {
			total_discoveries: records.len(),
			unique_pairs,
			ratings: RatingCounts { excellent: stats.excellent, good: stats.good },
			similarity_range: stats.similarity,
			domains: stats.domains,
			sessions,
			domain_pairs: stats.domain_pairs,
			api_version: API_VERSION.to_string(),
			capabilities: Capabilities {
				filtering: true,
				sorting: true,
				pagination: true,
				writing: false,
				database: source == RecordSource::Postgres,
			},
			source,
		})
	}
}
