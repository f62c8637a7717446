mod flatten;
mod registry;
mod types;

pub use flatten::{FlattenedModel, ProviderChoice, extract_providers, flatten, observed_modalities};
#[cfg(feature = "http-client")]
pub use registry::{DirCache, fetch_catalog, load_catalog};
pub use registry::{API_URL, MemoryCache, SessionCache};
pub use types::{
    Catalog, Modalities, ModelCost, ModelInfo, ModelLimit, ModelProviderOverride, ModelStatus,
    ProviderInfo,
};
