use aq_domain::{Discovery, Document, DomainPair, Editorial, Rating};

/// A minimal discovery with deterministic paper titles derived from `id`.
pub fn discovery(id: i64, similarity: f64, rating: Rating) -> Discovery {
	discovery_in(id, similarity, rating, "econ", "q-bio")
}

pub fn discovery_in(
	id: i64,
	similarity: f64,
	rating: Rating,
	first_domain: &str,
	second_domain: &str,
) -> Discovery {
	Discovery {
		id,
		title: None,
		similarity,
		rating,
		domains: DomainPair::new(first_domain, second_domain),
		explanation: format!("Shared feedback structure #{id}."),
		pattern: None,
		session: None,
		paper_1: document(id, 1, first_domain),
		paper_2: document(id, 2, second_domain),
		editorial: None,
	}
}

pub fn editorial(public_title: &str) -> Editorial {
	Editorial {
		title: format!("{public_title} (editorial)"),
		public_title: public_title.to_string(),
		subtitle: None,
		tags: vec!["feedback".to_string()],
		body: Some("Body text.".to_string()),
		evidence_basis: Some("Both abstracts describe the loop.".to_string()),
		mechanism_anchor: None,
	}
}

/// Five excellent `econ`/`q-bio` records with similarities 0.9 down to 0.5, ids 1 through 5.
pub fn ladder() -> Vec<Discovery> {
	[0.9, 0.8, 0.7, 0.6, 0.5]
		.into_iter()
		.enumerate()
		.map(|(idx, similarity)| discovery(idx as i64 + 1, similarity, Rating::Excellent))
		.collect()
}

/// A mixed collection covering both ratings, several domains and sessions.
pub fn mixed() -> Vec<Discovery> {
	let mut records = vec![
		discovery_in(1, 0.81, Rating::Excellent, "econ", "q-bio"),
		discovery_in(2, 0.64, Rating::Good, "physics", "cs"),
		discovery_in(3, 0.77, Rating::Good, "q-bio", "econ"),
		discovery_in(4, 0.92, Rating::Excellent, "cs", "math"),
		discovery_in(5, 0.58, Rating::Good, "econ", "physics"),
		discovery_in(6, 0.77, Rating::Excellent, "math", "q-bio"),
		discovery_in(7, 0.70, Rating::Good, "cs", "physics"),
	];

	let sessions = [Some(37), Some(38), None, Some(40), Some(37), Some(41), Some(38)];

	for (record, session) in records.iter_mut().zip(sessions) {
		record.session = session;
	}

	records
}

fn document(id: i64, position: u8, domain: &str) -> Document {
	Document {
		title: format!("Paper {id}.{position}"),
		domain: domain.to_string(),
		arxiv_id: Some(format!("2401.{id:05}v{position}")),
		url: None,
		mechanism: format!("Mechanism {id}.{position}"),
	}
}
