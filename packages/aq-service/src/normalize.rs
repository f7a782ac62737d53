//! Conversion of stored shapes into the canonical [`Discovery`].
//!
//! This is the only place that knows about legacy field names. Records that cannot satisfy the
//! canonical invariants (current rating, similarity in `[0, 1]`) are dropped here.

use std::collections::{HashMap, HashSet};

use aq_domain::{Discovery, Document, DomainPair, Editorial, Rating, UNKNOWN_DOMAIN};
use aq_storage::{
	models::DiscoveryRow,
	static_files::{RawDiscovery, RawDocument, RawEditorial},
};

const UNTITLED: &str = "Untitled paper";

pub fn from_static(
	raw: Vec<RawDiscovery>,
	mut editorials: HashMap<i64, RawEditorial>,
) -> Vec<Discovery> {
	let total = raw.len();
	let mut seen = HashSet::with_capacity(total);
	let mut out = Vec::with_capacity(total);

	for record in raw {
		if !seen.insert(record.id) {
			tracing::warn!(id = record.id, "Skipping duplicate discovery id.");

			continue;
		}

		let editorial = editorials.remove(&record.id).and_then(editorial_from_raw);

		if let Some(discovery) = discovery_from_raw(record, editorial) {
			out.push(discovery);
		}
	}

	if out.len() < total {
		tracing::info!(kept = out.len(), dropped = total - out.len(), "Static discoveries normalized.");
	}

	out
}

pub fn from_row(row: DiscoveryRow) -> Option<Discovery> {
	let Some(rating) = Rating::parse(&row.rating) else {
		tracing::debug!(id = row.id, rating = %row.rating, "Skipping discovery with retired rating.");

		return None;
	};

	if !valid_similarity(row.similarity) {
		tracing::warn!(id = row.id, similarity = row.similarity, "Skipping discovery with invalid similarity.");

		return None;
	}

	let editorial = editorial_from_raw(RawEditorial {
		editorial_title: row.editorial_title,
		public_title: row.public_title,
		subtitle: row.subtitle,
		body: row.body,
		tags: row.tags.unwrap_or_default(),
		evidence_basis: row.evidence_basis,
		mechanism_anchor: row.mechanism_anchor,
	});
	let paper_1 = document(
		Some(row.paper_1_title.as_str()),
		row.paper_1_domain.as_deref(),
		row.paper_1_arxiv_id.as_deref(),
		row.paper_1_url.as_deref(),
		Some(row.mechanism_1_description.as_str()),
	);
	let paper_2 = document(
		Some(row.paper_2_title.as_str()),
		row.paper_2_domain.as_deref(),
		row.paper_2_arxiv_id.as_deref(),
		row.paper_2_url.as_deref(),
		Some(row.mechanism_2_description.as_str()),
	);

	Some(Discovery {
		id: row.id,
		title: first_text([row.title.as_deref()]),
		similarity: row.similarity,
		rating,
		domains: DomainPair::new(paper_1.domain.clone(), paper_2.domain.clone()),
		explanation: row.explanation.unwrap_or_default(),
		pattern: first_text([row.pattern.as_deref()]),
		session: row.session,
		paper_1,
		paper_2,
		editorial,
	})
}

fn discovery_from_raw(raw: RawDiscovery, editorial: Option<Editorial>) -> Option<Discovery> {
	let Some(rating) = raw.rating.as_deref().and_then(Rating::parse) else {
		tracing::debug!(id = raw.id, rating = ?raw.rating, "Skipping discovery with retired rating.");

		return None;
	};
	let Some(similarity) = raw.similarity.filter(|value| valid_similarity(*value)) else {
		tracing::warn!(id = raw.id, similarity = ?raw.similarity, "Skipping discovery with invalid similarity.");

		return None;
	};
	let listed = raw.domains.unwrap_or_default();
	let nested = raw.papers.unwrap_or_default();
	let flat_1 = raw.paper_1.unwrap_or_default();
	let flat_2 = raw.paper_2.unwrap_or_default();
	let nested_1 = nested.paper_1.unwrap_or_default();
	let nested_2 = nested.paper_2.unwrap_or_default();
	let paper_1 = merged_document(
		[&flat_1, &nested_1],
		listed.first().map(String::as_str),
		raw.paper_1_title.as_deref(),
		raw.paper_1_domain.as_deref(),
		raw.paper_1_arxiv_id.as_deref(),
		raw.paper_1_url.as_deref(),
		raw.mechanism_1_description.as_deref(),
	);
	let paper_2 = merged_document(
		[&flat_2, &nested_2],
		listed.get(1).map(String::as_str),
		raw.paper_2_title.as_deref(),
		raw.paper_2_domain.as_deref(),
		raw.paper_2_arxiv_id.as_deref(),
		raw.paper_2_url.as_deref(),
		raw.mechanism_2_description.as_deref(),
	);

	Some(Discovery {
		id: raw.id,
		title: first_text([raw.title.as_deref()]),
		similarity,
		rating,
		domains: DomainPair::new(paper_1.domain.clone(), paper_2.domain.clone()),
		explanation: first_text([raw.explanation.as_deref(), raw.structural_explanation.as_deref()])
			.unwrap_or_default(),
		pattern: first_text([raw.pattern.as_deref()]),
		session: raw.session,
		paper_1,
		paper_2,
		editorial,
	})
}

/// `listed_domain` comes from the record-level `domains` array and wins over per-paper tags.
fn merged_document(
	sources: [&RawDocument; 2],
	listed_domain: Option<&str>,
	title: Option<&str>,
	domain: Option<&str>,
	arxiv_id: Option<&str>,
	url: Option<&str>,
	mechanism: Option<&str>,
) -> Document {
	let [flat, nested] = sources;

	document(
		first_text([flat.title.as_deref(), nested.title.as_deref(), title]).as_deref(),
		first_text([listed_domain, flat.domain.as_deref(), nested.domain.as_deref(), domain])
			.as_deref(),
		first_text([flat.arxiv_id.as_deref(), nested.arxiv_id.as_deref(), arxiv_id]).as_deref(),
		first_text([flat.url.as_deref(), nested.url.as_deref(), url]).as_deref(),
		first_text([flat.mechanism.as_deref(), nested.mechanism.as_deref(), mechanism]).as_deref(),
	)
}

fn document(
	title: Option<&str>,
	domain: Option<&str>,
	arxiv_id: Option<&str>,
	url: Option<&str>,
	mechanism: Option<&str>,
) -> Document {
	let arxiv_id = first_text([arxiv_id]);
	let url = first_text([url])
		.or_else(|| arxiv_id.as_deref().map(|id| format!("https://arxiv.org/abs/{id}")));

	Document {
		title: first_text([title]).unwrap_or_else(|| UNTITLED.to_string()),
		domain: first_text([domain]).unwrap_or_else(|| UNKNOWN_DOMAIN.to_string()),
		arxiv_id,
		url,
		mechanism: first_text([mechanism]).unwrap_or_default(),
	}
}

fn editorial_from_raw(raw: RawEditorial) -> Option<Editorial> {
	let public_title =
		first_text([raw.public_title.as_deref(), raw.editorial_title.as_deref()])?;
	let title = first_text([raw.editorial_title.as_deref()]).unwrap_or_else(|| public_title.clone());

	Some(Editorial {
		title,
		public_title,
		subtitle: first_text([raw.subtitle.as_deref()]),
		tags: raw.tags.into_iter().filter(|tag| !tag.trim().is_empty()).collect(),
		body: first_text([raw.body.as_deref()]),
		evidence_basis: first_text([raw.evidence_basis.as_deref()]),
		mechanism_anchor: first_text([raw.mechanism_anchor.as_deref()]),
	})
}

fn first_text<'a, I>(candidates: I) -> Option<String>
where
	I: IntoIterator<Item = Option<&'a str>>,
{
	candidates
		.into_iter()
		.flatten()
		.map(str::trim)
		.find(|value| !value.is_empty())
		.map(str::to_string)
}

fn valid_similarity(value: f64) -> bool {
	value.is_finite() && (0.0..=1.0).contains(&value)
}
