//! Filter, sort and paginate a discovery collection.
//!
//! Everything here is a pure function of its inputs: the collection is borrowed, never
//! mutated, and every call allocates its own result.

use std::cmp::{Ordering, Reverse};

use serde::{Deserialize, Serialize};

use crate::{
	discovery::Discovery,
	query::{DiscoveryFilter, DiscoveryQuery, RatingTieBreak, SortBy, SortOrder},
	stats::DiscoveryStats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
	StaticJson,
	Postgres,
}
impl RecordSource {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::StaticJson => "static_json",
			Self::Postgres => "postgres",
		}
	}
}

/// The filters that were actually applied, after coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
	pub rating: Option<String>,
	pub domain: Option<String>,
	pub min_similarity: Option<f64>,
}
impl From<&DiscoveryFilter> for AppliedFilters {
	fn from(filter: &DiscoveryFilter) -> Self {
		Self {
			rating: filter.rating.clone(),
			domain: filter.domain.clone(),
			min_similarity: filter.min_similarity,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
	/// Matches after filtering, before pagination.
	pub total: usize,
	pub returned: usize,
	pub offset: usize,
	pub limit: Option<usize>,
	pub filters: AppliedFilters,
	/// Computed over the filtered, unpaginated set.
	pub stats: DiscoveryStats,
	pub source: RecordSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryPage {
	pub data: Vec<Discovery>,
	pub metadata: PageMetadata,
}

pub fn run(records: &[Discovery], query: &DiscoveryQuery, source: RecordSource) -> DiscoveryPage {
	let mut matched = filter(records, &query.filter);

	sort(&mut matched, query.sort_by, query.order, query.rating_tie_break);

	let total = matched.len();
	let stats = DiscoveryStats::compute(matched.iter().copied());
	let data =
		paginate(matched, query.offset, query.limit).into_iter().cloned().collect::<Vec<_>>();

	DiscoveryPage {
		metadata: PageMetadata {
			total,
			returned: data.len(),
			offset: query.offset,
			limit: query.limit,
			filters: AppliedFilters::from(&query.filter),
			stats,
			source,
		},
		data,
	}
}

/// Applies rating, then domain membership, then the similarity floor.
pub fn filter<'a>(records: &'a [Discovery], filter: &DiscoveryFilter) -> Vec<&'a Discovery> {
	records.iter().filter(|discovery| filter.matches(discovery)).collect()
}

/// Stable sort. `Desc` puts the larger key first for every sort key.
pub fn sort(
	records: &mut [&Discovery],
	sort_by: SortBy,
	order: SortOrder,
	rating_tie_break: RatingTieBreak,
) {
	if sort_by == SortBy::Domain {
		match order {
			SortOrder::Asc => records.sort_by_cached_key(|d| d.domains.canonical_key()),
			SortOrder::Desc => records.sort_by_cached_key(|d| Reverse(d.domains.canonical_key())),
		}

		return;
	}

	records.sort_by(|a, b| compare(a, b, sort_by, order, rating_tie_break));
}

pub fn paginate<T>(items: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
	items.into_iter().skip(offset).take(limit.unwrap_or(usize::MAX)).collect()
}

fn compare(
	a: &Discovery,
	b: &Discovery,
	sort_by: SortBy,
	order: SortOrder,
	rating_tie_break: RatingTieBreak,
) -> Ordering {
	let primary = match sort_by {
		SortBy::Similarity => a.similarity.total_cmp(&b.similarity),
		SortBy::Rating => a.rating.cmp(&b.rating),
		SortBy::Id => a.id.cmp(&b.id),
		SortBy::Session => a.session_or_zero().cmp(&b.session_or_zero()),
		SortBy::Domain => a.domains.canonical_key().cmp(&b.domains.canonical_key()),
	};
	let primary = directed(primary, order);

	if sort_by != SortBy::Rating || primary != Ordering::Equal {
		return primary;
	}

	let similarity = a.similarity.total_cmp(&b.similarity);

	match rating_tie_break {
		RatingTieBreak::FollowOrder => directed(similarity, order),
		RatingTieBreak::SimilarityDesc => similarity.reverse(),
	}
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
	match order {
		SortOrder::Asc => ordering,
		SortOrder::Desc => ordering.reverse(),
	}
}
