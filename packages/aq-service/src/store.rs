use std::sync::Arc;

use serde_json::{Map, Value};

use aq_config::{Config, StorageBackend};
use aq_domain::{Discovery, DiscoveryFilter, RecordSource};
use aq_storage::{
	db::Db,
	models::PairRecord,
	queries::{self, DiscoveryFilterArgs, PairFilterArgs},
	static_files::StaticCatalog,
};

use crate::{BoxFuture, DiscoveryStore, Error, PairFilter, Result, normalize};

/// In-memory collection read from the packaged JSON files, normalized once.
pub struct StaticStore {
	records: Arc<[Discovery]>,
	pairs: Vec<PairRecord>,
	pair_metadata: Map<String, Value>,
}
impl StaticStore {
	pub fn from_catalog(catalog: StaticCatalog) -> Self {
		let StaticCatalog { discoveries, editorials, pairs } = catalog;

		Self {
			records: normalize::from_static(discoveries, editorials).into(),
			pairs: pairs.discovered_pairs,
			pair_metadata: pairs.metadata,
		}
	}

	/// Builds a store from records that are already canonical. Pairs are left empty.
	pub fn from_records(records: Vec<Discovery>) -> Self {
		Self { records: records.into(), pairs: Vec::new(), pair_metadata: Map::new() }
	}
}
impl DiscoveryStore for StaticStore {
	fn source(&self) -> RecordSource {
		RecordSource::StaticJson
	}

	fn load<'a>(&'a self, filter: &'a DiscoveryFilter) -> BoxFuture<'a, Result<Vec<Discovery>>> {
		Box::pin(async move {
			Ok(self.records.iter().filter(|discovery| filter.matches(discovery)).cloned().collect())
		})
	}

	fn get<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Discovery>>> {
		Box::pin(async move { Ok(self.records.iter().find(|discovery| discovery.id == id).cloned()) })
	}

	fn pairs<'a>(&'a self, filter: &'a PairFilter) -> BoxFuture<'a, Result<Vec<PairRecord>>> {
		Box::pin(async move {
			Ok(self.pairs.iter().filter(|pair| filter.matches(pair)).cloned().collect())
		})
	}

	/// Falls back to the discovery count when no pair catalog was packaged.
	fn unique_pair_count<'a>(&'a self) -> BoxFuture<'a, Result<usize>> {
		Box::pin(async move {
			Ok(if self.pairs.is_empty() { self.records.len() } else { self.pairs.len() })
		})
	}

	fn pair_metadata(&self) -> Map<String, Value> {
		self.pair_metadata.clone()
	}
}

/// PostgreSQL-backed collection. Filters are pushed down; rows are normalized on read.
pub struct PgStore {
	db: Db,
}
impl PgStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
impl DiscoveryStore for PgStore {
	fn source(&self) -> RecordSource {
		RecordSource::Postgres
	}

	fn load<'a>(&'a self, filter: &'a DiscoveryFilter) -> BoxFuture<'a, Result<Vec<Discovery>>> {
		Box::pin(async move {
			let args = DiscoveryFilterArgs {
				rating: filter.rating.as_deref(),
				domain: filter.domain.as_deref(),
				min_similarity: filter.min_similarity,
			};
			let rows = queries::fetch_discoveries(&self.db, args).await?;

			Ok(rows.into_iter().filter_map(normalize::from_row).collect())
		})
	}

	fn get<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Discovery>>> {
		Box::pin(async move {
			let row = queries::fetch_discovery(&self.db, id).await?;

			Ok(row.and_then(normalize::from_row))
		})
	}

	fn pairs<'a>(&'a self, filter: &'a PairFilter) -> BoxFuture<'a, Result<Vec<PairRecord>>> {
		Box::pin(async move {
			let args = PairFilterArgs {
				session: filter.session,
				rating: filter.rating.as_deref(),
				min_similarity: filter.min_similarity,
			};

			Ok(queries::fetch_pairs(&self.db, args).await?)
		})
	}

	fn unique_pair_count<'a>(&'a self) -> BoxFuture<'a, Result<usize>> {
		Box::pin(async move {
			let count = queries::count_pairs(&self.db).await?;

			Ok(usize::try_from(count).unwrap_or_default())
		})
	}

	fn close<'a>(&'a self) -> BoxFuture<'a, ()> {
		Box::pin(self.db.close())
	}
}

/// Opens the backend named by `storage.backend`. The postgres schema is applied on open.
pub async fn open_store(cfg: &Config) -> Result<Arc<dyn DiscoveryStore>> {
	match cfg.storage.backend {
		StorageBackend::Static => {
			let Some(files) = cfg.storage.static_files.as_ref() else {
				return Err(Error::StoreUnavailable {
					message: "storage.static_files is not configured.".to_string(),
				});
			};
			let catalog = StaticCatalog::load(files)?;

			Ok(Arc::new(StaticStore::from_catalog(catalog)))
		},
		StorageBackend::Postgres => {
			let Some(postgres) = cfg.storage.postgres.as_ref() else {
				return Err(Error::StoreUnavailable {
					message: "storage.postgres is not configured.".to_string(),
				});
			};
			let db = Db::connect(postgres).await?;

			db.ensure_schema().await?;

			tracing::info!(max_conns = postgres.pool_max_conns, "PostgreSQL store ready.");

			Ok(Arc::new(PgStore::new(db)))
		},
	}
}
