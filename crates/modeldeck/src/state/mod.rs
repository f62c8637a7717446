mod codec;
mod sync;

pub use codec::{decode, encode};
pub use sync::{HistorySink, LoadState, MemoryHistory, Session};

use crate::query::{Capability, SortKey};

/// Sentinel provider id meaning "no provider filter".
pub const ALL_PROVIDERS: &str = "all";

/// The combined search/filter/sort/page/selection state driving the query
/// engine. Seeded from the URL once at load, then mutated only by explicit
/// user actions or browser navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search: String,
    pub provider: String,
    pub caps: Vec<Capability>,
    pub input_modality: Vec<String>,
    pub output_modality: Vec<String>,
    pub sort: SortKey,
    pub page: usize,
    /// Model id of the open detail view, `None` while closed.
    pub model_id: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        ViewState {
            search: String::new(),
            provider: ALL_PROVIDERS.to_string(),
            caps: Vec::new(),
            input_modality: Vec::new(),
            output_modality: Vec::new(),
            sort: SortKey::default(),
            page: 1,
            model_id: None,
        }
    }

    /// Whether any filter deviates from its default. Drives the caller's
    /// "reset" affordance; page and detail selection do not count.
    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty()
            || self.provider != ALL_PROVIDERS
            || !self.caps.is_empty()
            || !self.input_modality.is_empty()
            || !self.output_modality.is_empty()
            || self.sort != SortKey::default()
    }
}
