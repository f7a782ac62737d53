use std::path::PathBuf;

use serde::Deserialize;

use aq_domain::RatingTieBreak;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub query: Query,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
	Static,
	Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub backend: StorageBackend,
	/// Required when `backend = "static"`.
	pub static_files: Option<StaticFiles>,
	/// Required when `backend = "postgres"`.
	pub postgres: Option<Postgres>,
}

/// Packaged JSON data files. Relative paths resolve against the config file's directory.
#[derive(Debug, Deserialize)]
pub struct StaticFiles {
	pub discoveries: PathBuf,
	pub editorials: Option<PathBuf>,
	pub pairs: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	/// Empty falls back to `DATABASE_URL`, then `POSTGRES_URL`.
	#[serde(default)]
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Query {
	/// `follow_order` or `similarity_desc`; anything else fails to parse.
	#[serde(default)]
	pub rating_tie_break: RatingTieBreak,
	#[serde(default = "default_featured_limit")]
	pub featured_limit: usize,
}
impl Default for Query {
	fn default() -> Self {
		Self {
			rating_tie_break: RatingTieBreak::default(),
			featured_limit: default_featured_limit(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	#[serde(default = "default_bind_localhost_only")]
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: default_bind_localhost_only() }
	}
}

fn default_acquire_timeout_ms() -> u64 {
	5_000
}

fn default_featured_limit() -> usize {
	3
}

fn default_bind_localhost_only() -> bool {
	true
}
