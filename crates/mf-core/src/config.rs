//! Job configuration and parsing for maskflow.yml

use crate::error::{CoreError, CoreResult};
use crate::mapping::JobMapping;
use crate::serde_helpers::default_true;
use crate::table_name::TableName;
use crate::transformer::Transformer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Default job file name looked up by [`JobConfig::load_from_dir`]
pub const JOB_FILE_NAME: &str = "maskflow.yml";

/// A sync job: what to copy and how each column is anonymized
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Job identifier, also part of cache keys
    pub job_id: String,

    /// Schemas whose metadata is loaded.
    ///
    /// When empty, the schemas named by the mappings are used.
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Fail compilation when a mapped table gains columns that are not mapped
    #[serde(default = "default_true")]
    pub halt_on_new_column: bool,

    /// Key/value cache used to carry circular foreign key values between passes
    #[serde(default)]
    pub cache: Option<CacheConfig>,

    /// Row filters per table, applied when reading the source
    #[serde(default)]
    pub subsets: BTreeMap<TableName, String>,

    /// Column mappings
    #[serde(default)]
    pub mappings: Vec<JobMapping>,

    /// User-defined transformer definitions keyed by id
    #[serde(default)]
    pub transformers: BTreeMap<String, Transformer>,
}

/// Connection settings for the bridge cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Cache URL, e.g. `redis://localhost:6379`
    pub url: String,

    /// Deployment topology
    #[serde(default)]
    pub kind: CacheKind,

    /// Master name for failover deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<String>,
}

/// Cache deployment topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// Single node
    #[default]
    Simple,
    /// Sharded cluster
    Cluster,
    /// Sentinel-managed failover group
    Failover,
}

impl std::fmt::Display for CacheKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKind::Simple => write!(f, "simple"),
            CacheKind::Cluster => write!(f, "cluster"),
            CacheKind::Failover => write!(f, "failover"),
        }
    }
}

impl JobConfig {
    /// Load a job from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Load a job from a directory.
    /// Looks for maskflow.yml or maskflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join(JOB_FILE_NAME);
        let yaml_path = dir.join("maskflow.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Parse and validate a job from YAML text
    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: JobConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Schemas to load metadata for, in configured order
    pub fn effective_schemas(&self) -> Vec<String> {
        if !self.schemas.is_empty() {
            return self.schemas.clone();
        }
        let mut seen = BTreeSet::new();
        self.mappings
            .iter()
            .filter(|m| seen.insert(m.schema.as_str()))
            .map(|m| m.schema.clone())
            .collect()
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.job_id.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "job_id cannot be empty".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for m in &self.mappings {
            if !seen.insert((m.schema.as_str(), m.table.as_str(), m.column.as_str())) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Duplicate mapping for column {}.{}.{}",
                        m.schema, m.table, m.column
                    ),
                });
            }
            if !self.schemas.is_empty() && !self.schemas.contains(&m.schema) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Mapping for {}.{}.{} uses schema '{}' which is not listed in schemas",
                        m.schema, m.table, m.column, m.schema
                    ),
                });
            }
        }

        for table in self.subsets.keys() {
            TableName::parse_qualified(table)?;
        }

        if let Some(cache) = &self.cache {
            if cache.url.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "cache.url cannot be empty".to_string(),
                });
            }
            if cache.kind == CacheKind::Failover && cache.master.is_none() {
                return Err(CoreError::ConfigInvalid {
                    message: "cache.master is required for failover caches".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
