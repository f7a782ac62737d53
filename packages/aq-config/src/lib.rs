mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Query, Security, Service, StaticFiles, Storage, StorageBackend};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

const DSN_ENV_VARS: [&str; 2] = ["DATABASE_URL", "POSTGRES_URL"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;
	let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

	normalize(&mut cfg, base_dir, |key| env::var(key).ok());

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	match cfg.storage.backend {
		StorageBackend::Static => {
			let Some(files) = cfg.storage.static_files.as_ref() else {
				return Err(Error::Validation {
					message: "storage.static_files is required when storage.backend is static."
						.to_string(),
				});
			};

			if files.discoveries.as_os_str().is_empty() {
				return Err(Error::Validation {
					message: "storage.static_files.discoveries must be non-empty.".to_string(),
				});
			}
		},
		StorageBackend::Postgres => {
			let Some(postgres) = cfg.storage.postgres.as_ref() else {
				return Err(Error::Validation {
					message: "storage.postgres is required when storage.backend is postgres."
						.to_string(),
				});
			};

			if postgres.dsn.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.postgres.dsn must be non-empty; set it or DATABASE_URL."
						.to_string(),
				});
			}
			if postgres.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: "storage.postgres.pool_max_conns must be greater than zero."
						.to_string(),
				});
			}
			if postgres.acquire_timeout_ms == 0 {
				return Err(Error::Validation {
					message: "storage.postgres.acquire_timeout_ms must be greater than zero."
						.to_string(),
				});
			}
		},
	}

	if cfg.query.featured_limit == 0 {
		return Err(Error::Validation {
			message: "query.featured_limit must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize<F>(cfg: &mut Config, base_dir: &Path, lookup_env: F)
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(postgres) = cfg.storage.postgres.as_mut()
		&& postgres.dsn.trim().is_empty()
	{
		postgres.dsn = DSN_ENV_VARS
			.iter()
			.find_map(|key| lookup_env(key).filter(|value| !value.trim().is_empty()))
			.unwrap_or_default();
	}
	if let Some(files) = cfg.storage.static_files.as_mut() {
		files.discoveries = resolve(base_dir, &files.discoveries);
		files.editorials = files
			.editorials
			.as_deref()
			.filter(|path| !path.as_os_str().is_empty())
			.map(|path| resolve(base_dir, path));
		files.pairs = files
			.pairs
			.as_deref()
			.filter(|path| !path.as_os_str().is_empty())
			.map(|path| resolve(base_dir, path));
	}
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() || path.as_os_str().is_empty() {
		path.to_path_buf()
	} else {
		base_dir.join(path)
	}
}
