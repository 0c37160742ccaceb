//! User-defined transformer resolution

use crate::error::{PlanError, PlanResult};
use async_trait::async_trait;
use mf_core::Transformer;
use std::collections::{BTreeMap, HashSet};

/// Looks up stored transformer definitions by id.
#[async_trait]
pub trait TransformerDefinitionSource: Send + Sync {
    /// Fetch the definition stored under `id`
    async fn get_transformer(&self, id: &str) -> PlanResult<Transformer>;
}

/// Definitions held in memory, usually the `transformers` section of a job
#[derive(Debug, Clone, Default)]
pub struct MapDefinitionSource {
    definitions: BTreeMap<String, Transformer>,
}

impl MapDefinitionSource {
    pub fn new(definitions: BTreeMap<String, Transformer>) -> Self {
        Self { definitions }
    }
}

#[async_trait]
impl TransformerDefinitionSource for MapDefinitionSource {
    async fn get_transformer(&self, id: &str) -> PlanResult<Transformer> {
        self.definitions
            .get(id)
            .cloned()
            .ok_or_else(|| PlanError::TransformerLookup {
                id: id.to_string(),
                message: "no definition with this id".to_string(),
            })
    }
}

/// Follow user-defined references until a concrete transformer is reached.
///
/// A definition chain that revisits an id is an error.
pub async fn resolve_transformer(
    source: &dyn TransformerDefinitionSource,
    transformer: &Transformer,
) -> PlanResult<Transformer> {
    let mut current = transformer.clone();
    let mut chain: Vec<String> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();

    while let Transformer::UserDefined(cfg) = &current {
        chain.push(cfg.id.clone());
        if !visited.insert(cfg.id.clone()) {
            return Err(PlanError::UserDefinedCycle {
                chain: chain.join(" -> "),
            });
        }
        let next = source.get_transformer(&cfg.id).await?;
        log::debug!("Resolved user-defined transformer {} to {}", cfg.id, next);
        current = next;
    }

    Ok(current)
}
