use aq_domain::{
	Discovery, DiscoveryFilter, DiscoveryQuery, QueryParams, Rating, RatingTieBreak, RecordSource,
	SortBy, SortOrder, engine,
};
use aq_testkit::fixtures;

fn ids(records: &[Discovery]) -> Vec<i64> {
	records.iter().map(|record| record.id).collect()
}

fn query(sort_by: SortBy, order: SortOrder) -> DiscoveryQuery {
	DiscoveryQuery { sort_by, order, ..Default::default() }
}

fn run(records: &[Discovery], query: &DiscoveryQuery) -> aq_domain::DiscoveryPage {
	engine::run(records, query, RecordSource::StaticJson)
}

fn two_records() -> Vec<Discovery> {
	vec![
		fixtures::discovery(1, 0.8, Rating::Good),
		fixtures::discovery(2, 0.6, Rating::Excellent),
	]
}

#[test]
fn similarity_desc_orders_highest_first() {
	let page = run(&two_records(), &query(SortBy::Similarity, SortOrder::Desc));

	assert_eq!(ids(&page.data), vec![1, 2]);
}

#[test]
fn rating_filter_is_exact_match() {
	let query = DiscoveryQuery {
		filter: DiscoveryFilter { rating: Some("excellent".to_string()), ..Default::default() },
		..Default::default()
	};
	let page = run(&two_records(), &query);

	assert_eq!(ids(&page.data), vec![2]);
	assert_eq!(page.metadata.total, 1);
	assert_eq!(page.metadata.stats.excellent, 1);
	assert_eq!(page.metadata.stats.good, 0);
}

#[test]
fn unknown_rating_filter_matches_nothing() {
	let query = DiscoveryQuery {
		filter: DiscoveryFilter { rating: Some("weak".to_string()), ..Default::default() },
		..Default::default()
	};
	let page = run(&two_records(), &query);

	assert!(page.data.is_empty());
	assert_eq!(page.metadata.total, 0);
}

#[test]
fn limit_and_offset_slice_after_sorting() {
	let query = DiscoveryQuery { limit: Some(2), offset: 2, ..Default::default() };
	let page = run(&fixtures::ladder(), &query);

	assert_eq!(ids(&page.data), vec![3, 4]);
	assert_eq!(page.metadata.total, 5);
	assert_eq!(page.metadata.returned, 2);
	assert_eq!(page.metadata.offset, 2);
	assert_eq!(page.metadata.limit, Some(2));
}

#[test]
fn empty_result_has_null_similarity_stats() {
	let query = DiscoveryQuery {
		filter: DiscoveryFilter { min_similarity: Some(0.95), ..Default::default() },
		..Default::default()
	};
	let page = run(&fixtures::ladder(), &query);

	assert!(page.data.is_empty());
	assert_eq!(page.metadata.total, 0);
	assert_eq!(page.metadata.stats.similarity.min, None);
	assert_eq!(page.metadata.stats.similarity.max, None);
	assert_eq!(page.metadata.stats.similarity.mean, None);

	let json = serde_json::to_value(&page.metadata).expect("Failed to serialize metadata.");

	assert!(json["stats"]["similarity"]["mean"].is_null());
}

#[test]
fn domain_filter_matches_either_position() {
	let records = vec![fixtures::discovery_in(9, 0.7, Rating::Good, "q-bio", "econ")];
	let query = DiscoveryQuery {
		filter: DiscoveryFilter { domain: Some("econ".to_string()), ..Default::default() },
		..Default::default()
	};
	let page = run(&records, &query);

	assert_eq!(ids(&page.data), vec![9]);
}

#[test]
fn min_similarity_is_inclusive() {
	let query = DiscoveryQuery {
		filter: DiscoveryFilter { min_similarity: Some(0.7), ..Default::default() },
		..Default::default()
	};
	let page = run(&fixtures::ladder(), &query);

	assert_eq!(ids(&page.data), vec![1, 2, 3]);
}

#[test]
fn every_returned_record_satisfies_all_filters() {
	let filter = DiscoveryFilter {
		rating: Some("good".to_string()),
		domain: Some("physics".to_string()),
		min_similarity: Some(0.6),
	};
	let query = DiscoveryQuery { filter: filter.clone(), ..Default::default() };
	let page = run(&fixtures::mixed(), &query);

	assert_eq!(ids(&page.data), vec![7, 2]);
	assert!(page.data.iter().all(|record| filter.matches(record)));
	assert_eq!(page.metadata.filters.domain.as_deref(), Some("physics"));
}

#[test]
fn total_ignores_pagination() {
	let records = fixtures::mixed();
	let full = run(&records, &DiscoveryQuery::default());

	for (offset, limit) in [(0, Some(1)), (3, Some(2)), (6, None), (10, Some(4)), (0, Some(0))] {
		let page = run(&records, &DiscoveryQuery { offset, limit, ..Default::default() });

		assert_eq!(page.metadata.total, full.metadata.total);
		assert_eq!(page.metadata.returned, page.data.len());
		assert_eq!(page.metadata.stats, full.metadata.stats);
	}
}

#[test]
fn zero_limit_returns_metadata_only() {
	let page = run(&fixtures::mixed(), &DiscoveryQuery { limit: Some(0), ..Default::default() });

	assert!(page.data.is_empty());
	assert_eq!(page.metadata.total, 7);
}

#[test]
fn offset_past_end_is_empty() {
	let page = run(&fixtures::ladder(), &DiscoveryQuery { offset: 50, ..Default::default() });

	assert!(page.data.is_empty());
	assert_eq!(page.metadata.total, 5);
}

#[test]
fn pages_partition_the_sorted_sequence() {
	let records = fixtures::mixed();
	let full = run(&records, &query(SortBy::Session, SortOrder::Asc));
	let mut stitched = Vec::new();
	let mut offset = 0;

	loop {
		let page = run(
			&records,
			&DiscoveryQuery {
				sort_by: SortBy::Session,
				order: SortOrder::Asc,
				limit: Some(3),
				offset,
				..Default::default()
			},
		);

		if page.data.is_empty() {
			break;
		}

		offset += page.data.len();

		stitched.extend(page.data);
	}

	assert_eq!(ids(&stitched), ids(&full.data));
}

#[test]
fn sorting_is_idempotent() {
	let records = fixtures::mixed();

	for sort_by in [SortBy::Similarity, SortBy::Rating, SortBy::Id, SortBy::Session, SortBy::Domain] {
		for order in [SortOrder::Asc, SortOrder::Desc] {
			let once = run(&records, &query(sort_by, order));
			let twice = run(&once.data, &query(sort_by, order));

			assert_eq!(ids(&once.data), ids(&twice.data), "{sort_by:?} {order:?}");
		}
	}
}

#[test]
fn similarity_ties_keep_input_order() {
	let records = fixtures::mixed();
	let page = run(&records, &query(SortBy::Similarity, SortOrder::Desc));

	// Records 3 and 6 share 0.77; 3 comes first in the input.
	assert_eq!(ids(&page.data), vec![4, 1, 3, 6, 7, 2, 5]);

	let page = run(&records, &query(SortBy::Similarity, SortOrder::Asc));

	assert_eq!(ids(&page.data), vec![5, 2, 7, 3, 6, 1, 4]);
}

#[test]
fn rating_sort_puts_excellent_first_then_similarity() {
	let page = run(&fixtures::mixed(), &query(SortBy::Rating, SortOrder::Desc));

	assert_eq!(ids(&page.data), vec![4, 1, 6, 3, 7, 2, 5]);
}

#[test]
fn rating_sort_ascending_follows_order_for_ties() {
	let page = run(&fixtures::mixed(), &query(SortBy::Rating, SortOrder::Asc));

	assert_eq!(ids(&page.data), vec![5, 2, 7, 3, 6, 1, 4]);
}

#[test]
fn rating_sort_ascending_with_legacy_tie_break() {
	let query = query(SortBy::Rating, SortOrder::Asc)
		.with_rating_tie_break(RatingTieBreak::SimilarityDesc);
	let page = run(&fixtures::mixed(), &query);

	assert_eq!(ids(&page.data), vec![3, 7, 2, 5, 4, 1, 6]);
}

#[test]
fn id_sort_respects_order() {
	let records = fixtures::mixed();

	assert_eq!(
		ids(&run(&records, &query(SortBy::Id, SortOrder::Asc)).data),
		vec![1, 2, 3, 4, 5, 6, 7]
	);
	assert_eq!(
		ids(&run(&records, &query(SortBy::Id, SortOrder::Desc)).data),
		vec![7, 6, 5, 4, 3, 2, 1]
	);
}

#[test]
fn session_sort_treats_missing_as_zero() {
	let page = run(&fixtures::mixed(), &query(SortBy::Session, SortOrder::Asc));

	assert_eq!(ids(&page.data), vec![3, 1, 5, 2, 7, 4, 6]);
}

#[test]
fn domain_sort_uses_canonical_pair_key() {
	let page = run(&fixtures::mixed(), &query(SortBy::Domain, SortOrder::Asc));

	// cs-math, cs-physics (2, 7), econ-physics, econ-q-bio (1, 3), math-q-bio.
	assert_eq!(ids(&page.data), vec![4, 2, 7, 5, 1, 3, 6]);

	let page = run(&fixtures::mixed(), &query(SortBy::Domain, SortOrder::Desc));

	assert_eq!(ids(&page.data), vec![6, 1, 3, 5, 2, 7, 4]);
}

#[test]
fn domain_filter_is_idempotent() {
	let query = DiscoveryQuery {
		filter: DiscoveryFilter { domain: Some("econ".to_string()), ..Default::default() },
		..Default::default()
	};
	let once = run(&fixtures::mixed(), &query);
	let twice = run(&once.data, &query);

	assert_eq!(ids(&once.data), ids(&twice.data));
}

#[test]
fn stats_cover_the_filtered_set() {
	let page = run(&fixtures::mixed(), &DiscoveryQuery { limit: Some(1), ..Default::default() });
	let stats = &page.metadata.stats;

	assert_eq!(stats.excellent, 3);
	assert_eq!(stats.good, 4);
	assert_eq!(stats.domains, vec!["cs", "econ", "math", "physics", "q-bio"]);
	assert_eq!(stats.unique_domains, 5);
	assert_eq!(stats.similarity.min, Some(0.58));
	assert_eq!(stats.similarity.max, Some(0.92));
	assert_eq!(stats.domain_pairs[0].pair, "cs-physics");
	assert_eq!(stats.domain_pairs[0].count, 2);
	assert_eq!(stats.domain_pairs[1].pair, "econ-q-bio");
	assert_eq!(stats.domain_pairs[1].count, 2);
}

#[test]
fn input_collection_is_not_mutated() {
	let records = fixtures::mixed();
	let before = records.clone();
	let _ = run(&records, &query(SortBy::Domain, SortOrder::Desc));

	assert_eq!(records, before);
}

#[test]
fn query_from_params_end_to_end() {
	let params = QueryParams {
		rating: Some("good".to_string()),
		min_similarity: Some("not-a-number".to_string()),
		sort_by: Some("id".to_string()),
		order: Some("asc".to_string()),
		limit: Some("2".to_string()),
		offset: Some("-4".to_string()),
		..Default::default()
	};
	let page = run(&fixtures::mixed(), &DiscoveryQuery::from_params(&params));

	assert_eq!(ids(&page.data), vec![2, 3]);
	assert_eq!(page.metadata.total, 4);
	assert_eq!(page.metadata.filters.min_similarity, None);
}
