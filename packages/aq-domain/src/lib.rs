pub mod discovery;
pub mod engine;
pub mod query;
pub mod stats;

pub use discovery::{
	DOMAIN_PAIR_SEPARATOR, Discovery, Document, DomainPair, Editorial, Rating, UNKNOWN_DOMAIN,
};
pub use engine::{AppliedFilters, DiscoveryPage, PageMetadata, RecordSource};
pub use query::{DiscoveryFilter, DiscoveryQuery, QueryParams, RatingTieBreak, SortBy, SortOrder};
pub use stats::{DiscoveryStats, DomainPairCount, SimilarityStats};
