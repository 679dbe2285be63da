use crate::domain::Entity;
use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level pipeline configuration, loaded from `healthetl.toml` with
/// environment overrides. Every field has a default so a bare checkout runs
/// against `./data` with fixture-generated inputs.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EtlConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub warehouse: WarehouseConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub sources: SourceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Root directory holding the bronze/ and silver/ layers.
    #[serde(default = "default_data_root")]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    /// Path of the warehouse database file.
    #[serde(default = "default_warehouse_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    /// Fact tables are written in batches of this many rows.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Optional per-entity source files. An unset entry means the extractor falls
/// back to deterministic fixture generation for that entity.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SourceConfig {
    pub claims: Option<PathBuf>,
    pub patients: Option<PathBuf>,
    pub providers: Option<PathBuf>,
    pub prescriptions: Option<PathBuf>,
}

fn default_data_root() -> PathBuf {
    PathBuf::from("./data")
}

fn default_warehouse_path() -> PathBuf {
    PathBuf::from("./data/warehouse.db")
}

fn default_batch_size() -> usize {
    1000
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_data_root(),
        }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            path: default_warehouse_path(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

impl EtlConfig {
    /// Load configuration from the given file (or `healthetl.toml` if present),
    /// then apply environment overrides. A missing config file is not an
    /// error; defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let config_path = path.unwrap_or_else(|| Path::new("healthetl.toml"));
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(config_path).map_err(|e| {
                EtlError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Ok(root) = env::var("HEALTHETL_DATA_ROOT") {
            config.data.root = PathBuf::from(root);
        }
        if let Ok(path) = env::var("HEALTHETL_WAREHOUSE") {
            config.warehouse.path = PathBuf::from(path);
        }

        if config.load.batch_size == 0 {
            return Err(EtlError::Config(
                "load.batch_size must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn bronze_dir(&self) -> PathBuf {
        self.data.root.join("bronze")
    }

    pub fn silver_dir(&self) -> PathBuf {
        self.data.root.join("silver")
    }
}

impl SourceConfig {
    pub fn for_entity(&self, entity: Entity) -> Option<&Path> {
        match entity {
            Entity::Claims => self.claims.as_deref(),
            Entity::Patients => self.patients.as_deref(),
            Entity::Providers => self.providers.as_deref(),
            Entity::Prescriptions => self.prescriptions.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config_file() {
        let config = EtlConfig::default();
        assert_eq!(config.data.root, PathBuf::from("./data"));
        assert_eq!(config.load.batch_size, 1000);
        assert!(config.sources.claims.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let config: EtlConfig = toml::from_str(
            r#"
            [data]
            root = "/tmp/etl"

            [sources]
            claims = "/tmp/claims.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.root, PathBuf::from("/tmp/etl"));
        assert_eq!(config.bronze_dir(), PathBuf::from("/tmp/etl/bronze"));
        assert_eq!(
            config.sources.for_entity(Entity::Claims),
            Some(Path::new("/tmp/claims.csv"))
        );
        assert_eq!(config.sources.for_entity(Entity::Patients), None);
        assert_eq!(config.load.batch_size, 1000);
    }
}
