use aq_domain::{Discovery, Document};
use sqlx::{Connection, PgConnection};

use crate::Result;

/// Writes canonical records into an already bootstrapped schema.
///
/// Paper and mechanism ids are derived from the discovery id (`id * 10 + position`), and one
/// discovered pair is recorded per discovery under its session (0 when absent).
pub async fn seed_discoveries(dsn: &str, records: &[Discovery]) -> Result<()> {
	let mut conn = PgConnection::connect(dsn).await?;
	let mut tx = conn.begin().await?;

	for record in records {
		let paper_ids = [record.id * 10 + 1, record.id * 10 + 2];

		for (paper_id, document) in paper_ids.into_iter().zip([&record.paper_1, &record.paper_2]) {
			insert_document(&mut *tx, paper_id, document).await?;
		}

		sqlx::query(
			"\
INSERT INTO discoveries (id, mechanism_1_id, mechanism_2_id, similarity, rating, title, explanation, pattern, session)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
		)
		.bind(record.id)
		.bind(paper_ids[0])
		.bind(paper_ids[1])
		.bind(record.similarity)
		.bind(record.rating.as_str())
		.bind(record.title.as_deref())
		.bind(record.explanation.as_str())
		.bind(record.pattern.as_deref())
		.bind(record.session)
		.execute(&mut *tx)
		.await?;

		if let Some(editorial) = record.editorial.as_ref() {
			sqlx::query(
				"\
INSERT INTO discovery_editorials (discovery_id, editorial_title, public_title, subtitle, body, tags, evidence_basis, mechanism_anchor)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
			)
			.bind(record.id)
			.bind(editorial.title.as_str())
			.bind(editorial.public_title.as_str())
			.bind(editorial.subtitle.as_deref())
			.bind(editorial.body.as_deref())
			.bind(&editorial.tags)
			.bind(editorial.evidence_basis.as_deref())
			.bind(editorial.mechanism_anchor.as_deref())
			.execute(&mut *tx)
			.await?;
		}

		sqlx::query(
			"INSERT INTO discovered_pairs (paper_1_id, paper_2_id, discovered_in_session) VALUES ($1, $2, $3)",
		)
		.bind(paper_ids[0])
		.bind(paper_ids[1])
		.bind(record.session_or_zero())
		.execute(&mut *tx)
		.await?;
	}

	tx.commit().await?;

	Ok(())
}

/// The mechanism shares the paper's id.
async fn insert_document(conn: &mut PgConnection, paper_id: i64, document: &Document) -> Result<()> {
	sqlx::query("INSERT INTO papers (id, title, domain, arxiv_id, url) VALUES ($1, $2, $3, $4, $5)")
		.bind(paper_id)
		.bind(document.title.as_str())
		.bind(document.domain.as_str())
		.bind(document.arxiv_id.as_deref())
		.bind(document.url.as_deref())
		.execute(&mut *conn)
		.await?;
	sqlx::query("INSERT INTO mechanisms (id, paper_id, description) VALUES ($1, $2, $3)")
		.bind(paper_id)
		.bind(paper_id)
		.bind(document.mechanism.as_str())
		.execute(&mut *conn)
		.await?;

	Ok(())
}
