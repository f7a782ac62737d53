//! Packaged JSON data files.
//!
//! The discovery file has accumulated several shapes over time, so the raw types here accept
//! every historical field name and leave the choice between them to the caller.

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Error, Result, models::PairRecord};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
	pub paper_id: Option<i64>,
	pub arxiv_id: Option<String>,
	pub domain: Option<String>,
	pub title: Option<String>,
	pub mechanism: Option<String>,
	pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPapers {
	pub paper_1: Option<RawDocument>,
	pub paper_2: Option<RawDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDiscovery {
	pub id: i64,
	pub title: Option<String>,
	pub domains: Option<Vec<String>>,
	pub explanation: Option<String>,
	pub structural_explanation: Option<String>,
	pub pattern: Option<String>,
	pub similarity: Option<f64>,
	pub rating: Option<String>,
	pub session: Option<i64>,
	pub papers: Option<RawPapers>,
	pub paper_1: Option<RawDocument>,
	pub paper_2: Option<RawDocument>,
	pub paper_1_title: Option<String>,
	pub paper_2_title: Option<String>,
	pub paper_1_domain: Option<String>,
	pub paper_2_domain: Option<String>,
	pub paper_1_arxiv_id: Option<String>,
	pub paper_2_arxiv_id: Option<String>,
	pub paper_1_url: Option<String>,
	pub paper_2_url: Option<String>,
	pub mechanism_1_description: Option<String>,
	pub mechanism_2_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEditorial {
	pub editorial_title: Option<String>,
	pub public_title: Option<String>,
	pub subtitle: Option<String>,
	pub body: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	pub evidence_basis: Option<String>,
	pub mechanism_anchor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EditorialFile {
	#[serde(default)]
	editorials: HashMap<String, RawEditorial>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PairsFile {
	#[serde(default)]
	pub metadata: Map<String, Value>,
	#[serde(default)]
	pub discovered_pairs: Vec<PairRecord>,
}

/// Everything the static backend serves, read once at startup.
#[derive(Debug, Default)]
pub struct StaticCatalog {
	pub discoveries: Vec<RawDiscovery>,
	/// Keyed by discovery id.
	pub editorials: HashMap<i64, RawEditorial>,
	pub pairs: PairsFile,
}
impl StaticCatalog {
	pub fn load(files: &aq_config::StaticFiles) -> Result<Self> {
		let discoveries: Vec<RawDiscovery> = read_json(&files.discoveries)?;
		let editorials = match files.editorials.as_deref() {
			Some(path) => parse_editorial_keys(read_json::<EditorialFile>(path)?),
			None => HashMap::new(),
		};
		let pairs = match files.pairs.as_deref() {
			Some(path) => read_json(path)?,
			None => PairsFile::default(),
		};

		tracing::info!(
			discoveries = discoveries.len(),
			editorials = editorials.len(),
			pairs = pairs.discovered_pairs.len(),
			"Static catalog loaded."
		);

		Ok(Self { discoveries, editorials, pairs })
	}
}

fn read_json<T>(path: &Path) -> Result<T>
where
	T: DeserializeOwned,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadFile { path: path.to_path_buf(), source: err })?;

	serde_json::from_str(&raw).map_err(|err| Error::ParseFile { path: path.to_path_buf(), source: err })
}

fn parse_editorial_keys(file: EditorialFile) -> HashMap<i64, RawEditorial> {
	let mut out = HashMap::with_capacity(file.editorials.len());

	for (key, editorial) in file.editorials {
		match key.trim().parse::<i64>() {
			Ok(id) => {
				out.insert(id, editorial);
			},
			Err(_) => {
				tracing::warn!(key = %key, "Skipping editorial with a non-numeric discovery id.");
			},
		}
	}

	out
}
