use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The raw provider→model dataset as served by models.dev.
///
/// Keys are provider ids. `BTreeMap` keeps iteration deterministic, which the
/// flattener relies on for its stable tie-break order.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Catalog {
    pub providers: BTreeMap<String, ProviderInfo>,
}

impl From<BTreeMap<String, ProviderInfo>> for Catalog {
    fn from(providers: BTreeMap<String, ProviderInfo>) -> Self {
        Catalog { providers }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub env: Vec<String>,
    pub npm: Option<String>,
    pub api: Option<String>,
    pub doc: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelInfo>,
}

/// One model entry, fields flat as on the wire.
///
/// Every field except `id`/`name` is optional upstream, so the whole struct
/// deserializes permissively via `#[serde(default)]`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub family: Option<String>,
    pub reasoning: bool,
    pub tool_call: bool,
    pub structured_output: bool,
    pub attachment: bool,
    pub open_weights: bool,
    pub temperature: bool,
    pub knowledge: Option<String>,
    pub release_date: Option<String>,
    pub last_updated: Option<String>,
    pub modalities: Option<Modalities>,
    pub cost: Option<ModelCost>,
    pub limit: Option<ModelLimit>,
    pub status: Option<ModelStatus>,
    /// Per-model override of the owning provider's package/API identifiers.
    pub provider: Option<ModelProviderOverride>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Modalities {
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ModelCost {
    pub input: Option<f64>,
    pub output: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_read: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_write: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ModelLimit {
    pub context: Option<u64>,
    pub output: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Alpha,
    Beta,
    Deprecated,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ModelProviderOverride {
    pub npm: Option<String>,
    pub api: Option<String>,
}

impl ModelInfo {
    /// Get context window limit in tokens
    pub fn context_limit(&self) -> Option<u64> {
        self.limit.as_ref().and_then(|l| l.context)
    }

    /// Get maximum output tokens
    pub fn output_limit(&self) -> Option<u64> {
        self.limit.as_ref().and_then(|l| l.output)
    }

    pub fn input_cost(&self) -> Option<f64> {
        self.cost.as_ref().and_then(|c| c.input)
    }

    pub fn output_cost(&self) -> Option<f64> {
        self.cost.as_ref().and_then(|c| c.output)
    }

    pub fn input_modalities(&self) -> &[String] {
        self.modalities.as_ref().map(|m| m.input.as_slice()).unwrap_or(&[])
    }

    pub fn output_modalities(&self) -> &[String] {
        self.modalities.as_ref().map(|m| m.output.as_slice()).unwrap_or(&[])
    }

    /// Sort key for recency orderings; a missing date sorts after any
    /// present one when compared descending.
    pub fn last_updated_key(&self) -> &str {
        self.last_updated.as_deref().unwrap_or("")
    }

    pub fn release_date_key(&self) -> &str {
        self.release_date.as_deref().unwrap_or("")
    }
}

impl Catalog {
    pub fn get_provider(&self, id: &str) -> Option<&ProviderInfo> {
        self.providers.get(id)
    }

    pub fn get_model(&self, provider: &str, model: &str) -> Option<&ModelInfo> {
        self.providers
            .get(provider)
            .and_then(|provider| provider.models.get(model))
    }

    pub fn list_providers(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    pub fn list_models(&self, provider: &str) -> Vec<&str> {
        self.providers
            .get(provider)
            .map(|provider| provider.models.keys().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }
}
