use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

/// Stand-in for a document whose domain tag is missing upstream.
pub const UNKNOWN_DOMAIN: &str = "unknown";
pub const DOMAIN_PAIR_SEPARATOR: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
	Excellent,
	Good,
}
impl Rating {
	pub const ALL: [Self; 2] = [Self::Excellent, Self::Good];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Excellent => "excellent",
			Self::Good => "good",
		}
	}

	/// Returns `None` for historical tags such as `weak` or `false`.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim() {
			"excellent" => Some(Self::Excellent),
			"good" => Some(Self::Good),
			_ => None,
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Self::Excellent => 1,
			Self::Good => 0,
		}
	}
}
impl Ord for Rating {
	fn cmp(&self, other: &Self) -> Ordering {
		self.rank().cmp(&other.rank())
	}
}
impl PartialOrd for Rating {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl fmt::Display for Rating {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The two domain tags of a discovery, one per source document.
///
/// Position is kept for display, but grouping and sorting go through [`DomainPair::canonical_key`]
/// so that `["q-bio", "econ"]` and `["econ", "q-bio"]` land in the same bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainPair([String; 2]);
impl DomainPair {
	pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
		Self([normalize_domain(first.into()), normalize_domain(second.into())])
	}

	pub fn first(&self) -> &str {
		&self.0[0]
	}

	pub fn second(&self) -> &str {
		&self.0[1]
	}

	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	pub fn contains(&self, domain: &str) -> bool {
		self.0.iter().any(|value| value == domain)
	}

	pub fn canonical_key(&self) -> String {
		let mut sorted = [self.first(), self.second()];

		sorted.sort_unstable();

		sorted.join(DOMAIN_PAIR_SEPARATOR)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
	pub title: String,
	pub domain: String,
	pub arxiv_id: Option<String>,
	pub url: Option<String>,
	pub mechanism: String,
}

/// Human-authored presentation content. Never consulted when filtering or sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Editorial {
	pub title: String,
	pub public_title: String,
	pub subtitle: Option<String>,
	pub tags: Vec<String>,
	pub body: Option<String>,
	pub evidence_basis: Option<String>,
	pub mechanism_anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
	pub id: i64,
	pub title: Option<String>,
	pub similarity: f64,
	pub rating: Rating,
	pub domains: DomainPair,
	pub explanation: String,
	pub pattern: Option<String>,
	pub session: Option<i64>,
	pub paper_1: Document,
	pub paper_2: Document,
	pub editorial: Option<Editorial>,
}
impl Discovery {
	pub fn display_title(&self) -> String {
		if let Some(editorial) = self.editorial.as_ref()
			&& !editorial.public_title.trim().is_empty()
		{
			return editorial.public_title.clone();
		}
		if let Some(title) = self.title.as_ref()
			&& !title.trim().is_empty()
		{
			return title.clone();
		}

		format!("{} / {}", self.paper_1.title, self.paper_2.title)
	}

	pub fn session_or_zero(&self) -> i64 {
		self.session.unwrap_or(0)
	}

	pub fn has_editorial(&self) -> bool {
		self.editorial.is_some()
	}
}

fn normalize_domain(raw: String) -> String {
	let trimmed = raw.trim();

	if trimmed.is_empty() { UNKNOWN_DOMAIN.to_string() } else { trimmed.to_string() }
}
