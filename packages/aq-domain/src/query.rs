use serde::{Deserialize, Serialize};

use crate::discovery::Discovery;

/// Raw query-string parameters as received from an HTTP request or a page loader.
///
/// Every field is kept as text so that coercion happens in one place, [`DiscoveryQuery::from_params`],
/// with the permissive fallbacks a read-only listing wants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
	pub rating: Option<String>,
	pub domain: Option<String>,
	pub min_similarity: Option<String>,
	pub sort_by: Option<String>,
	pub order: Option<String>,
	pub limit: Option<String>,
	pub offset: Option<String>,
}
impl QueryParams {
	/// Builds params from decoded query-string pairs. A repeated key keeps its first value;
	/// unknown keys are ignored.
	pub fn from_pairs<I>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut params = Self::default();

		for (key, value) in pairs {
			let slot = match key.as_str() {
				"rating" => &mut params.rating,
				"domain" => &mut params.domain,
				"minSimilarity" => &mut params.min_similarity,
				"sortBy" => &mut params.sort_by,
				"order" => &mut params.order,
				"limit" => &mut params.limit,
				"offset" => &mut params.offset,
				_ => continue,
			};

			slot.get_or_insert(value);
		}

		params
	}
}

/// First value recorded for `key` in decoded query-string pairs.
pub fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
	pairs.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
	#[default]
	Similarity,
	Rating,
	Id,
	Session,
	Domain,
}
impl SortBy {
	/// Unknown keys fall back to similarity.
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"rating" => Self::Rating,
			"id" => Self::Id,
			"session" => Self::Session,
			"domain" => Self::Domain,
			_ => Self::Similarity,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Similarity => "similarity",
			Self::Rating => "rating",
			Self::Id => "id",
			Self::Session => "session",
			Self::Domain => "domain",
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	Asc,
	#[default]
	Desc,
}
impl SortOrder {
	pub fn parse(raw: &str) -> Self {
		if raw.trim().eq_ignore_ascii_case("asc") { Self::Asc } else { Self::Desc }
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

/// How ties between equally rated records are ordered under `sortBy=rating`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTieBreak {
	/// Similarity follows the requested order, same as the primary key.
	#[default]
	FollowOrder,
	/// Similarity is always descending, whatever the requested order. Legacy listing behavior.
	SimilarityDesc,
}

/// Record-level predicates. Each field narrows independently; `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryFilter {
	pub rating: Option<String>,
	pub domain: Option<String>,
	pub min_similarity: Option<f64>,
}
impl DiscoveryFilter {
	pub fn matches(&self, discovery: &Discovery) -> bool {
		if let Some(rating) = self.rating.as_deref()
			&& discovery.rating.as_str() != rating
		{
			return false;
		}
		if let Some(domain) = self.domain.as_deref()
			&& !discovery.domains.contains(domain)
		{
			return false;
		}
		if let Some(threshold) = self.min_similarity
			&& discovery.similarity < threshold
		{
			return false;
		}

		true
	}

	pub fn is_empty(&self) -> bool {
		self.rating.is_none() && self.domain.is_none() && self.min_similarity.is_none()
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryQuery {
	pub filter: DiscoveryFilter,
	pub sort_by: SortBy,
	pub order: SortOrder,
	pub limit: Option<usize>,
	pub offset: usize,
	pub rating_tie_break: RatingTieBreak,
}
impl DiscoveryQuery {
	pub fn from_params(params: &QueryParams) -> Self {
		Self {
			filter: DiscoveryFilter {
				rating: parse_text(params.rating.as_deref()),
				domain: parse_text(params.domain.as_deref()),
				min_similarity: params.min_similarity.as_deref().and_then(parse_float),
			},
			sort_by: params.sort_by.as_deref().map(SortBy::parse).unwrap_or_default(),
			order: params.order.as_deref().map(SortOrder::parse).unwrap_or_default(),
			limit: params.limit.as_deref().and_then(parse_limit),
			offset: params.offset.as_deref().map(parse_offset).unwrap_or(0),
			rating_tie_break: RatingTieBreak::default(),
		}
	}

	pub fn with_rating_tie_break(mut self, rating_tie_break: RatingTieBreak) -> Self {
		self.rating_tie_break = rating_tie_break;

		self
	}
}

pub fn parse_text(raw: Option<&str>) -> Option<String> {
	raw.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

pub fn parse_float(raw: &str) -> Option<f64> {
	raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Accepts `"12"` as well as `"12.7"` (truncated), like a lenient integer parse.
pub fn parse_integer(raw: &str) -> Option<i64> {
	let trimmed = raw.trim();

	if let Ok(value) = trimmed.parse::<i64>() {
		return Some(value);
	}

	parse_float(trimmed).map(|value| value.trunc() as i64)
}

/// Negative or unparseable limits mean "no limit".
pub fn parse_limit(raw: &str) -> Option<usize> {
	parse_integer(raw).and_then(|value| usize::try_from(value).ok())
}

/// Negative or unparseable offsets mean "from the start".
pub fn parse_offset(raw: &str) -> usize {
	parse_integer(raw).and_then(|value| usize::try_from(value).ok()).unwrap_or(0)
}
