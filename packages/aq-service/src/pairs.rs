//! Discovered paper pairs, the deduplicated record of which documents have been matched.

use std::{cmp::Ordering, collections::BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use aq_domain::{
	RecordSource, SimilarityStats, engine,
	query::{parse_float, parse_integer, parse_limit, parse_offset, parse_text},
};
use aq_storage::models::PairRecord;

use crate::{AnalogService, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairParams {
	pub session: Option<String>,
	pub rating: Option<String>,
	pub min_similarity: Option<String>,
	pub limit: Option<String>,
	pub offset: Option<String>,
}
impl PairParams {
	/// Same first-value-wins rule as `QueryParams::from_pairs`.
	pub fn from_pairs<I>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut params = Self::default();

		for (key, value) in pairs {
			let slot = match key.as_str() {
				"session" => &mut params.session,
				"rating" => &mut params.rating,
				"minSimilarity" => &mut params.min_similarity,
				"limit" => &mut params.limit,
				"offset" => &mut params.offset,
				_ => continue,
			};

			slot.get_or_insert(value);
		}

		params
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairFilter {
	pub session: Option<i64>,
	pub rating: Option<String>,
	pub min_similarity: Option<f64>,
}
impl PairFilter {
	/// A pair without a similarity never passes a similarity floor.
	pub fn matches(&self, pair: &PairRecord) -> bool {
		if let Some(session) = self.session
			&& pair.discovered_in_session != session
		{
			return false;
		}
		if let Some(rating) = self.rating.as_deref()
			&& pair.rating.as_deref() != Some(rating)
		{
			return false;
		}
		if let Some(threshold) = self.min_similarity
			&& !pair.similarity.is_some_and(|similarity| similarity >= threshold)
		{
			return false;
		}

		true
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairQuery {
	pub filter: PairFilter,
	pub limit: Option<usize>,
	pub offset: usize,
}
impl PairQuery {
	pub fn from_params(params: &PairParams) -> Self {
		Self {
			filter: PairFilter {
				session: params.session.as_deref().and_then(parse_integer),
				rating: parse_text(params.rating.as_deref()),
				min_similarity: params.min_similarity.as_deref().and_then(parse_float),
			},
			limit: params.limit.as_deref().and_then(parse_limit),
			offset: params.offset.as_deref().map(parse_offset).unwrap_or(0),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
	pub total: usize,
	pub excellent: usize,
	pub good: usize,
	pub sessions: Vec<i64>,
	pub similarity: SimilarityStats,
}
impl PairStats {
	pub fn compute(pairs: &[PairRecord]) -> Self {
		let count_rating =
			|rating: &str| pairs.iter().filter(|pair| pair.rating.as_deref() == Some(rating)).count();

		Self {
			total: pairs.len(),
			excellent: count_rating("excellent"),
			good: count_rating("good"),
			sessions: pairs
				.iter()
				.map(|pair| pair.discovered_in_session)
				.collect::<BTreeSet<_>>()
				.into_iter()
				.collect(),
			similarity: SimilarityStats::from_values(pairs.iter().filter_map(|pair| pair.similarity)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPageMetadata {
	/// Provenance fields from the pair catalog, flattened in.
	#[serde(flatten)]
	pub catalog: Map<String, Value>,
	pub total: usize,
	pub returned: usize,
	pub offset: usize,
	pub limit: Option<usize>,
	pub stats: PairStats,
	pub source: RecordSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPage {
	pub data: Vec<PairRecord>,
	pub metadata: PairPageMetadata,
}

impl AnalogService {
	pub async fn list_pairs(&self, params: &PairParams) -> Result<PairPage> {
		let query = PairQuery::from_params(params);
		let mut pairs = self.store.pairs(&query.filter).await?;

		pairs.retain(|pair| query.filter.matches(pair));
		sort_pairs(&mut pairs);

		let stats = PairStats::compute(&pairs);
		let total = pairs.len();
		let data = engine::paginate(pairs, query.offset, query.limit);
		let mut catalog = self.store.pair_metadata();

		for reserved in ["total", "returned", "offset", "limit", "stats", "source"] {
			catalog.remove(reserved);
		}

		Ok(PairPage {
			metadata: PairPageMetadata {
				catalog,
				total,
				returned: data.len(),
				offset: query.offset,
				limit: query.limit,
				stats,
				source: self.store.source(),
			},
			data,
		})
	}
}

/// Similarity descending with missing values last, then session descending.
pub fn sort_pairs(pairs: &mut [PairRecord]) {
	pairs.sort_by(|a, b| {
		let by_similarity = match (a.similarity, b.similarity) {
			(Some(left), Some(right)) => right.total_cmp(&left),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		};

		by_similarity.then_with(|| b.discovered_in_session.cmp(&a.discovered_in_session))
	});
}

#[cfg(test)]
mod tests {
	use aq_storage::models::PairRecord;

	use crate::pairs::{PairFilter, PairParams, sort_pairs};

	fn pair(id: i64, session: i64, similarity: Option<f64>) -> PairRecord {
		PairRecord {
			paper_1_id: id,
			paper_2_id: id + 100,
			discovered_in_session: session,
			similarity,
			rating: Some("good".to_string()),
			paper_1_title: None,
			paper_1_domain: None,
			paper_2_title: None,
			paper_2_domain: None,
		}
	}

	#[test]
	fn missing_similarity_sorts_last_then_session_breaks_ties() {
		let mut pairs =
			vec![pair(1, 37, None), pair(2, 37, Some(0.7)), pair(3, 40, Some(0.7)), pair(4, 38, Some(0.9))];

		sort_pairs(&mut pairs);

		assert_eq!(pairs.iter().map(|p| p.paper_1_id).collect::<Vec<_>>(), vec![4, 3, 2, 1]);
	}

	#[test]
	fn similarity_floor_excludes_unscored_pairs() {
		let filter = PairFilter { min_similarity: Some(0.5), ..Default::default() };

		assert!(!filter.matches(&pair(1, 37, None)));
		assert!(filter.matches(&pair(1, 37, Some(0.5))));
	}

	#[test]
	fn repeated_pair_params_keep_the_first_value() {
		let params = PairParams::from_pairs(vec![
			("session".to_string(), "38".to_string()),
			("session".to_string(), "40".to_string()),
			("offset".to_string(), "1".to_string()),
		]);

		assert_eq!(params.session.as_deref(), Some("38"));
		assert_eq!(params.offset.as_deref(), Some("1"));
		assert!(params.limit.is_none());
	}
}
