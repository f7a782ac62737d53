use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::discovery::{Discovery, Rating};

/// Min, max and mean of a similarity column. All `None` for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityStats {
	pub min: Option<f64>,
	pub max: Option<f64>,
	pub mean: Option<f64>,
}
impl SimilarityStats {
	pub fn from_values<I>(values: I) -> Self
	where
		I: IntoIterator<Item = f64>,
	{
		let mut count = 0_usize;
		let mut sum = 0.0_f64;
		let mut min = f64::INFINITY;
		let mut max = f64::NEG_INFINITY;

		for value in values {
			count += 1;
			sum += value;
			min = min.min(value);
			max = max.max(value);
		}

		if count == 0 {
			return Self::default();
		}

		Self { min: Some(min), max: Some(max), mean: Some(sum / count as f64) }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPairCount {
	pub pair: String,
	pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryStats {
	pub excellent: usize,
	pub good: usize,
	pub unique_domains: usize,
	pub domains: Vec<String>,
	pub similarity: SimilarityStats,
	pub domain_pairs: Vec<DomainPairCount>,
}
impl DiscoveryStats {
	pub fn compute<'a, I>(discoveries: I) -> Self
	where
		I: IntoIterator<Item = &'a Discovery>,
	{
		let mut excellent = 0;
		let mut good = 0;
		let mut domains = BTreeSet::new();
		let mut pairs: BTreeMap<String, usize> = BTreeMap::new();
		let mut similarities = Vec::new();

		for discovery in discoveries {
			match discovery.rating {
				Rating::Excellent => excellent += 1,
				Rating::Good => good += 1,
			}

			for domain in discovery.domains.as_slice() {
				domains.insert(domain.clone());
			}

			*pairs.entry(discovery.domains.canonical_key()).or_default() += 1;

			similarities.push(discovery.similarity);
		}

		let mut domain_pairs = pairs
			.into_iter()
			.map(|(pair, count)| DomainPairCount { pair, count })
			.collect::<Vec<_>>();

		// Keys arrive sorted from the map, so a stable sort on count keeps them as the tie-break.
		domain_pairs.sort_by(|a, b| b.count.cmp(&a.count));

		let domains = domains.into_iter().collect::<Vec<_>>();

		Self {
			excellent,
			good,
			unique_domains: domains.len(),
			domains,
			similarity: SimilarityStats::from_values(similarities),
			domain_pairs,
		}
	}
}
