use serde::Serialize;
use std::collections::BTreeSet;

use super::types::{Catalog, ModelInfo};

/// A model record merged with denormalized fields from its owning provider.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenedModel {
    #[serde(flatten)]
    pub model: ModelInfo,
    pub provider_id: String,
    pub provider_name: String,
    pub provider_npm: Option<String>,
    pub provider_api: Option<String>,
    pub provider_doc: Option<String>,
    pub provider_env: Vec<String>,
}

impl FlattenedModel {
    pub fn id(&self) -> &str {
        &self.model.id
    }

    pub fn name(&self) -> &str {
        &self.model.name
    }
}

/// One entry per provider for building filter choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderChoice {
    pub id: String,
    pub name: String,
}

/// Flatten the nested provider→model dataset into one record per
/// (provider, model) pair.
///
/// A model-level provider override wins over the provider default for the
/// package id and API base. Providers with an empty model map are skipped.
/// Output is sorted descending by `last_updated`, stable, so records without
/// a date end up last.
pub fn flatten(catalog: &Catalog) -> Vec<FlattenedModel> {
    let mut models = Vec::new();

    for (provider_id, provider) in &catalog.providers {
        for model in provider.models.values() {
            let override_npm = model.provider.as_ref().and_then(|p| p.npm.clone());
            let override_api = model.provider.as_ref().and_then(|p| p.api.clone());

            models.push(FlattenedModel {
                model: model.clone(),
                provider_id: provider_id.clone(),
                provider_name: provider.name.clone(),
                provider_npm: override_npm.or_else(|| provider.npm.clone()),
                provider_api: override_api.or_else(|| provider.api.clone()),
                provider_doc: provider.doc.clone(),
                provider_env: provider.env.clone(),
            });
        }
    }

    models.sort_by(|a, b| b.model.last_updated_key().cmp(a.model.last_updated_key()));
    models
}

/// Providers present in the dataset, ascending by display name.
pub fn extract_providers(catalog: &Catalog) -> Vec<ProviderChoice> {
    let mut providers: Vec<ProviderChoice> = catalog
        .providers
        .iter()
        .map(|(id, provider)| ProviderChoice {
            id: id.clone(),
            name: provider.name.clone(),
        })
        .collect();
    providers.sort_by(|a, b| a.name.cmp(&b.name));
    providers
}

/// The input and output modality vocabularies actually observed across the
/// flattened list, each sorted and deduplicated.
pub fn observed_modalities(models: &[FlattenedModel]) -> (Vec<String>, Vec<String>) {
    let mut inputs = BTreeSet::new();
    let mut outputs = BTreeSet::new();

    for flat in models {
        for modality in flat.model.input_modalities() {
            inputs.insert(modality.clone());
        }
        for modality in flat.model.output_modalities() {
            outputs.insert(modality.clone());
        }
    }

    (inputs.into_iter().collect(), outputs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{Modalities, ModelProviderOverride, ProviderInfo};
    use std::collections::BTreeMap;

    fn model(id: &str, last_updated: Option<&str>) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            name: id.to_uppercase(),
            last_updated: last_updated.map(str::to_string),
            ..Default::default()
        }
    }

    fn provider(id: &str, name: &str, models: Vec<ModelInfo>) -> ProviderInfo {
        ProviderInfo {
            id: id.to_string(),
            name: name.to_string(),
            npm: Some(format!("@ai-sdk/{id}")),
            models: models.into_iter().map(|m| (m.id.clone(), m)).collect(),
            ..Default::default()
        }
    }

    fn catalog(providers: Vec<ProviderInfo>) -> Catalog {
        providers
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    #[test]
    fn test_flatten_unique_composite_keys() {
        // Same model id under two providers must stay distinct.
        let cat = catalog(vec![
            provider("acme", "Acme", vec![model("shared", Some("2024-01-01"))]),
            provider("zeta", "Zeta", vec![model("shared", Some("2024-02-01"))]),
        ]);

        let flat = flatten(&cat);
        assert_eq!(flat.len(), 2);
        let mut keys: Vec<(String, String)> = flat
            .iter()
            .map(|m| (m.provider_id.clone(), m.id().to_string()))
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_flatten_sorted_by_last_updated_desc_missing_last() {
        let cat = catalog(vec![provider(
            "acme",
            "Acme",
            vec![
                model("old", Some("2023-05-01")),
                model("new", Some("2024-06-01")),
                model("undated", None),
            ],
        )]);

        let flat = flatten(&cat);
        let ids: Vec<&str> = flat.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_flatten_provider_override_fallback() {
        let mut overridden = model("special", Some("2024-01-01"));
        overridden.provider = Some(ModelProviderOverride {
            npm: Some("@custom/pkg".to_string()),
            api: None,
        });
        let plain = model("plain", Some("2024-01-02"));

        let mut p = provider("acme", "Acme", vec![overridden, plain]);
        p.api = Some("https://api.acme.dev".to_string());
        let cat = catalog(vec![p]);

        let flat = flatten(&cat);
        let special = flat.iter().find(|m| m.id() == "special").unwrap();
        let plain = flat.iter().find(|m| m.id() == "plain").unwrap();
        assert_eq!(special.provider_npm.as_deref(), Some("@custom/pkg"));
        assert_eq!(special.provider_api.as_deref(), Some("https://api.acme.dev"));
        assert_eq!(plain.provider_npm.as_deref(), Some("@ai-sdk/acme"));
    }

    #[test]
    fn test_flatten_skips_empty_providers() {
        let cat = catalog(vec![
            provider("empty", "Empty", vec![]),
            provider("acme", "Acme", vec![model("m", None)]),
        ]);
        let flat = flatten(&cat);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].provider_id, "acme");
    }

    #[test]
    fn test_extract_providers_sorted_by_name() {
        let cat = catalog(vec![
            provider("zeta", "Zeta", vec![]),
            provider("acme", "Acme", vec![]),
        ]);
        let providers = extract_providers(&cat);
        let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Zeta"]);
    }

    #[test]
    fn test_observed_modalities_sorted_dedup() {
        let mut a = model("a", None);
        a.modalities = Some(Modalities {
            input: vec!["text".into(), "image".into()],
            output: vec!["text".into()],
        });
        let mut b = model("b", None);
        b.modalities = Some(Modalities {
            input: vec!["text".into(), "audio".into()],
            output: vec!["text".into(), "audio".into()],
        });
        let cat = catalog(vec![provider("acme", "Acme", vec![a, b])]);

        let (inputs, outputs) = observed_modalities(&flatten(&cat));
        assert_eq!(inputs, vec!["audio", "image", "text"]);
        assert_eq!(outputs, vec!["audio", "text"]);
    }
}
