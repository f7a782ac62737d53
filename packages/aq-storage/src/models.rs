use serde::{Deserialize, Serialize};

/// One row of the discovery listing join: discovery, both mechanisms, both papers and the
/// optional editorial.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DiscoveryRow {
	pub id: i64,
	pub similarity: f64,
	pub rating: String,
	pub title: Option<String>,
	pub explanation: Option<String>,
	pub pattern: Option<String>,
	pub session: Option<i64>,
	pub paper_1_title: String,
	pub paper_1_domain: Option<String>,
	pub paper_1_arxiv_id: Option<String>,
	pub paper_1_url: Option<String>,
	pub mechanism_1_description: String,
	pub paper_2_title: String,
	pub paper_2_domain: Option<String>,
	pub paper_2_arxiv_id: Option<String>,
	pub paper_2_url: Option<String>,
	pub mechanism_2_description: String,
	pub editorial_title: Option<String>,
	pub public_title: Option<String>,
	pub subtitle: Option<String>,
	pub body: Option<String>,
	pub tags: Option<Vec<String>>,
	pub evidence_basis: Option<String>,
	pub mechanism_anchor: Option<String>,
}

/// A discovered paper pair. Shared by the `discovered_pairs` table and the packaged
/// `discovered_pairs.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PairRecord {
	pub paper_1_id: i64,
	pub paper_2_id: i64,
	pub discovered_in_session: i64,
	#[serde(default)]
	pub similarity: Option<f64>,
	#[serde(default)]
	pub rating: Option<String>,
	#[serde(default)]
	pub paper_1_title: Option<String>,
	#[serde(default)]
	pub paper_1_domain: Option<String>,
	#[serde(default)]
	pub paper_2_title: Option<String>,
	#[serde(default)]
	pub paper_2_domain: Option<String>,
}
