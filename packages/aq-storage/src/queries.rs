use sqlx::{Postgres, QueryBuilder};

use crate::{Result, db::Db, models::{DiscoveryRow, PairRecord}};

const DISCOVERY_SELECT: &str = "\
SELECT
	d.id,
	d.similarity,
	d.rating,
	d.title,
	d.explanation,
	d.pattern,
	d.session,
	p1.title AS paper_1_title,
	p1.domain AS paper_1_domain,
	p1.arxiv_id AS paper_1_arxiv_id,
	p1.url AS paper_1_url,
	m1.description AS mechanism_1_description,
	p2.title AS paper_2_title,
	p2.domain AS paper_2_domain,
	p2.arxiv_id AS paper_2_arxiv_id,
	p2.url AS paper_2_url,
	m2.description AS mechanism_2_description,
	e.editorial_title,
	e.public_title,
	e.subtitle,
	e.body,
	e.tags,
	e.evidence_basis,
	e.mechanism_anchor
FROM discoveries d
JOIN mechanisms m1 ON d.mechanism_1_id = m1.id
JOIN mechanisms m2 ON d.mechanism_2_id = m2.id
JOIN papers p1 ON m1.paper_id = p1.id
JOIN papers p2 ON m2.paper_id = p2.id
LEFT JOIN discovery_editorials e ON e.discovery_id = d.id
WHERE d.rating IN ('excellent', 'good')";

/// Predicates pushed down to the database. Ordering and pagination stay with the caller, which
/// needs the whole filtered set for totals and statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryFilterArgs<'a> {
	pub rating: Option<&'a str>,
	pub domain: Option<&'a str>,
	pub min_similarity: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PairFilterArgs<'a> {
	pub session: Option<i64>,
	pub rating: Option<&'a str>,
	pub min_similarity: Option<f64>,
}

pub async fn fetch_discoveries(
	db: &Db,
	args: DiscoveryFilterArgs<'_>,
) -> Result<Vec<DiscoveryRow>> {
	let mut builder = QueryBuilder::<Postgres>::new(DISCOVERY_SELECT);

	if let Some(rating) = args.rating {
		builder.push(" AND d.rating = ");
		builder.push_bind(rating);
	}
	// Compared in normalized form: trimmed, with blank or missing domains read as `unknown`.
	if let Some(domain) = args.domain {
		builder.push(" AND (COALESCE(NULLIF(btrim(p1.domain), ''), 'unknown') = ");
		builder.push_bind(domain);
		builder.push(" OR COALESCE(NULLIF(btrim(p2.domain), ''), 'unknown') = ");
		builder.push_bind(domain);
		builder.push(")");
	}
	if let Some(min_similarity) = args.min_similarity {
		builder.push(" AND d.similarity >= ");
		builder.push_bind(min_similarity);
	}

	builder.push(" ORDER BY d.id");

	let rows = builder.build_query_as::<DiscoveryRow>().fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn fetch_discovery(db: &Db, id: i64) -> Result<Option<DiscoveryRow>> {
	let mut builder = QueryBuilder::<Postgres>::new(DISCOVERY_SELECT);

	builder.push(" AND d.id = ");
	builder.push_bind(id);

	let row = builder.build_query_as::<DiscoveryRow>().fetch_optional(&db.pool).await?;

	Ok(row)
}

pub async fn fetch_pairs(db: &Db, args: PairFilterArgs<'_>) -> Result<Vec<PairRecord>> {
	let mut builder = QueryBuilder::<Postgres>::new(
		"\
SELECT DISTINCT ON (dp.paper_1_id, dp.paper_2_id)
	dp.paper_1_id,
	dp.paper_2_id,
	dp.discovered_in_session,
	d.similarity,
	d.rating,
	p1.title AS paper_1_title,
	p1.domain AS paper_1_domain,
	p2.title AS paper_2_title,
	p2.domain AS paper_2_domain
FROM discovered_pairs dp
LEFT JOIN papers p1 ON dp.paper_1_id = p1.id
LEFT JOIN papers p2 ON dp.paper_2_id = p2.id
LEFT JOIN (
	SELECT d_inner.similarity, d_inner.rating, m1.paper_id AS p1_id, m2.paper_id AS p2_id
	FROM discoveries d_inner
	JOIN mechanisms m1 ON d_inner.mechanism_1_id = m1.id
	JOIN mechanisms m2 ON d_inner.mechanism_2_id = m2.id
) d ON (
	(d.p1_id = dp.paper_1_id AND d.p2_id = dp.paper_2_id)
	OR (d.p1_id = dp.paper_2_id AND d.p2_id = dp.paper_1_id)
)
WHERE 1 = 1",
	);

	if let Some(session) = args.session {
		builder.push(" AND dp.discovered_in_session = ");
		builder.push_bind(session);
	}
	if let Some(rating) = args.rating {
		builder.push(" AND d.rating = ");
		builder.push_bind(rating);
	}
	if let Some(min_similarity) = args.min_similarity {
		builder.push(" AND d.similarity >= ");
		builder.push_bind(min_similarity);
	}

	// DISTINCT ON keeps the best-scoring discovery per pair.
	builder.push(" ORDER BY dp.paper_1_id, dp.paper_2_id, d.similarity DESC NULLS LAST");

	let rows = builder.build_query_as::<PairRecord>().fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn count_pairs(db: &Db) -> Result<i64> {
	let count: i64 =
		sqlx::query_scalar("SELECT count(*) FROM discovered_pairs").fetch_one(&db.pool).await?;

	Ok(count)
}
