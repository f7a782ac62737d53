use aq_config::Postgres;
use aq_storage::{
	db::Db,
	queries::{self, DiscoveryFilterArgs, PairFilterArgs},
};
use aq_testkit::TestDatabase;

async fn seed(db: &Db) {
	for statement in [
		"INSERT INTO papers (id, title, domain, arxiv_id) VALUES
			(1, 'Deposit runs', 'econ', '2301.00001'),
			(2, 'Quorum sensing', 'q-bio', NULL),
			(3, 'Packet congestion', 'cs', NULL),
			(4, 'Granular jamming', 'physics', NULL)",
		"INSERT INTO mechanisms (id, paper_id, description) VALUES
			(11, 1, 'Withdrawals raise default risk.'),
			(12, 2, 'Signal accumulates to a threshold.'),
			(13, 3, 'Retransmissions amplify delay.'),
			(14, 4, 'Density fluctuations grow into waves.')",
		"INSERT INTO discoveries (id, mechanism_1_id, mechanism_2_id, similarity, rating, explanation, session) VALUES
			(1, 11, 12, 0.74, 'excellent', 'Threshold cascade.', 37),
			(2, 13, 14, 0.61, 'good', 'Congestion waves.', 38),
			(3, 11, 14, 0.40, 'weak', 'Vocabulary overlap.', 36)",
		"INSERT INTO discovery_editorials (discovery_id, editorial_title, public_title, tags) VALUES
			(1, 'Runs', 'When depositors behave like bacteria', ARRAY['threshold'])",
		"INSERT INTO discovered_pairs (paper_1_id, paper_2_id, discovered_in_session) VALUES
			(1, 2, 37),
			(3, 4, 38)",
	] {
		sqlx::query(statement).execute(&db.pool).await.expect("Failed to seed test data.");
	}
}

async fn ids_in_domain(db: &Db, domain: &str) -> Vec<i64> {
	let args = DiscoveryFilterArgs { domain: Some(domain), ..Default::default() };
	let rows =
		queries::fetch_discoveries(db, args).await.expect("Failed to fetch discoveries by domain.");

	rows.iter().map(|row| row.id).collect()
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set AQ_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(base_dsn) = aq_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set AQ_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg =
		Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1, acquire_timeout_ms: 5_000 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	db.ensure_schema().await.expect("Failed to re-run schema bootstrap.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'discovery_editorials'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set AQ_PG_DSN to run."]
async fn discovery_filters_are_pushed_down() {
	let Some(base_dsn) = aq_testkit::env_dsn() else {
		eprintln!("Skipping discovery_filters_are_pushed_down; set AQ_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg =
		Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1, acquire_timeout_ms: 5_000 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	seed(&db).await;

	let all = queries::fetch_discoveries(&db, DiscoveryFilterArgs::default())
		.await
		.expect("Failed to fetch discoveries.");

	// The weak-rated row never leaves the database.
	assert_eq!(all.iter().map(|row| row.id).collect::<Vec<_>>(), vec![1, 2]);

	let by_domain = queries::fetch_discoveries(
		&db,
		DiscoveryFilterArgs { domain: Some("q-bio"), ..Default::default() },
	)
	.await
	.expect("Failed to fetch discoveries by domain.");

	assert_eq!(by_domain.len(), 1);
	assert_eq!(by_domain[0].public_title.as_deref(), Some("When depositors behave like bacteria"));
	assert_eq!(by_domain[0].tags.as_deref(), Some(&["threshold".to_string()][..]));

	let by_similarity = queries::fetch_discoveries(
		&db,
		DiscoveryFilterArgs { min_similarity: Some(0.7), rating: Some("excellent"), domain: None },
	)
	.await
	.expect("Failed to fetch discoveries by similarity.");

	assert_eq!(by_similarity.len(), 1);

	let missing = queries::fetch_discovery(&db, 99).await.expect("Failed to fetch discovery.");

	assert!(missing.is_none());

	let pairs = queries::fetch_pairs(&db, PairFilterArgs { session: Some(38), ..Default::default() })
		.await
		.expect("Failed to fetch pairs.");

	assert_eq!(pairs.len(), 1);
	assert_eq!(pairs[0].similarity, Some(0.61));
	assert_eq!(queries::count_pairs(&db).await.expect("Failed to count pairs."), 2);

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set AQ_PG_DSN to run."]
async fn domain_filter_matches_normalized_domains() {
	let Some(base_dsn) = aq_testkit::env_dsn() else {
		eprintln!("Skipping domain_filter_matches_normalized_domains; set AQ_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg =
		Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1, acquire_timeout_ms: 5_000 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	seed(&db).await;

	for statement in [
		"INSERT INTO papers (id, title, domain, arxiv_id) VALUES
			(5, 'Blank domain', '', NULL),
			(6, 'Padded domain', ' econ ', NULL)",
		"INSERT INTO mechanisms (id, paper_id, description) VALUES
			(15, 5, 'Unlabelled mechanism.'),
			(16, 6, 'Padded mechanism.')",
		"INSERT INTO discoveries (id, mechanism_1_id, mechanism_2_id, similarity, rating, explanation, session) VALUES
			(4, 15, 16, 0.66, 'good', 'Normalization case.', 39)",
	] {
		sqlx::query(statement).execute(&db.pool).await.expect("Failed to seed test data.");
	}

	assert_eq!(ids_in_domain(&db, "unknown").await, vec![4]);
	assert_eq!(ids_in_domain(&db, "econ").await, vec![1, 4]);
	assert!(ids_in_domain(&db, "").await.is_empty());

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
