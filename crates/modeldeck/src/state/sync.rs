use super::codec::{decode, encode};
use super::{ALL_PROVIDERS, ViewState};
use crate::catalog::{
    Catalog, FlattenedModel, ProviderChoice, extract_providers, flatten, observed_modalities,
};
use crate::query::{Capability, QueryResult, SortKey, matches_filters, run_query, total_pages};

/// The address bar and history stack, as an explicit collaborator.
///
/// The synchronizer is the only writer besides the user's own navigation; it
/// reads the current query before every write so a navigation that raced a
/// commit is never clobbered.
pub trait HistorySink {
    fn current_query(&self) -> String;
    fn push(&mut self, query: &str);
    fn replace(&mut self, query: &str);
}

/// In-process history stack. Backs the terminal front end and the tests;
/// `back`/`forward` stand in for the browser's navigation buttons.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        MemoryHistory {
            entries: vec![String::new()],
            index: 0,
        }
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        MemoryHistory {
            entries: vec![query.into()],
            index: 0,
        }
    }

    /// Navigate one entry back. Returns false at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Navigate one entry forward. Returns false at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        MemoryHistory::new()
    }
}

impl HistorySink for MemoryHistory {
    fn current_query(&self) -> String {
        self.entries[self.index].clone()
    }

    fn push(&mut self, query: &str) {
        // A push while navigated back drops the forward entries, as the
        // browser history API does.
        self.entries.truncate(self.index + 1);
        self.entries.push(query.to_string());
        self.index += 1;
    }

    fn replace(&mut self, query: &str) {
        self.entries[self.index] = query.to_string();
    }
}

/// Dataset loading lifecycle. A fetch failure is a terminal, displayable
/// state, not a crash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Owns the live view state and keeps it synchronized with the history sink.
///
/// All mutation is synchronous and serialized through the caller's single
/// event loop; every committed change writes the canonical query string back
/// to the sink. A search-text change pushes a new history entry, any other
/// change replaces the current one, and a write whose query already matches
/// the sink is skipped entirely.
pub struct Session<H: HistorySink> {
    history: H,
    page_size: usize,
    state: ViewState,
    last_written: Option<ViewState>,
    skip_next_write: bool,
    load: LoadState,
    models: Vec<FlattenedModel>,
    providers: Vec<ProviderChoice>,
    input_modalities: Vec<String>,
    output_modalities: Vec<String>,
}

impl<H: HistorySink> Session<H> {
    pub fn new(history: H) -> Self {
        Session::with_page_size(history, crate::PAGE_SIZE)
    }

    /// Seed the in-memory state from the sink's current query exactly once.
    pub fn with_page_size(history: H, page_size: usize) -> Self {
        let state = decode(&history.current_query());
        Session {
            history,
            page_size,
            last_written: Some(state.clone()),
            state,
            skip_next_write: false,
            load: LoadState::Loading,
            models: Vec::new(),
            providers: Vec::new(),
            input_modalities: Vec::new(),
            output_modalities: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Providers known to the current dataset, for filter choices.
    pub fn providers(&self) -> &[ProviderChoice] {
        &self.providers
    }

    pub fn input_modalities(&self) -> &[String] {
        &self.input_modalities
    }

    pub fn output_modalities(&self) -> &[String] {
        &self.output_modalities
    }

    /// Install a fetched dataset: flatten it, rebuild the filter
    /// vocabularies, drop selections the new data no longer supports, and
    /// resolve any deep-linked model id.
    pub fn set_catalog(&mut self, catalog: &Catalog) {
        self.models = flatten(catalog);
        self.providers = extract_providers(catalog);
        let (inputs, outputs) = observed_modalities(&self.models);
        self.input_modalities = inputs;
        self.output_modalities = outputs;
        self.load = LoadState::Ready;
        log::debug!(
            "catalog installed: {} providers, {} models",
            self.providers.len(),
            self.models.len()
        );
        self.reconcile();
        self.sync_url();
    }

    /// Record a terminal fetch failure.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.load = LoadState::Failed(message.into());
    }

    /// Re-seed state from the sink after a back/forward navigation. The next
    /// scheduled write is suppressed so decoding never mutates history.
    pub fn handle_navigation(&mut self) {
        self.skip_next_write = true;
        self.state = decode(&self.history.current_query());
        self.reconcile();
        self.sync_url();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
        self.state.page = 1;
        self.sync_url();
    }

    pub fn set_provider(&mut self, provider: impl Into<String>) {
        self.state.provider = provider.into();
        self.state.page = 1;
        self.reconcile();
        self.sync_url();
    }

    pub fn toggle_capability(&mut self, cap: Capability) {
        if self.state.caps.contains(&cap) {
            self.state.caps.retain(|c| *c != cap);
        } else {
            self.state.caps.push(cap);
        }
        self.state.page = 1;
        self.sync_url();
    }

    pub fn toggle_input_modality(&mut self, modality: impl Into<String>) {
        let modality = modality.into();
        if self.state.input_modality.contains(&modality) {
            self.state.input_modality.retain(|m| *m != modality);
        } else {
            self.state.input_modality.push(modality);
        }
        self.state.page = 1;
        self.reconcile();
        self.sync_url();
    }

    pub fn toggle_output_modality(&mut self, modality: impl Into<String>) {
        let modality = modality.into();
        if self.state.output_modality.contains(&modality) {
            self.state.output_modality.retain(|m| *m != modality);
        } else {
            self.state.output_modality.push(modality);
        }
        self.state.page = 1;
        self.reconcile();
        self.sync_url();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.state.sort = sort;
        self.state.page = 1;
        self.sync_url();
    }

    /// Jump to a page, clamped to `[1, total_pages]` for the current filters.
    pub fn set_page(&mut self, page: usize) {
        let pages = total_pages(self.filtered_count(), self.page_size);
        self.state.page = page.clamp(1, pages);
        self.sync_url();
    }

    /// Open the detail view for a model. An id that does not resolve against
    /// the flattened list is ignored.
    pub fn open_detail(&mut self, model_id: &str) {
        if self.resolve(model_id).is_none() {
            log::debug!("ignoring detail request for unknown model {model_id}");
            return;
        }
        self.state.model_id = Some(model_id.to_string());
        self.sync_url();
    }

    pub fn close_detail(&mut self) {
        if self.state.model_id.take().is_some() {
            self.sync_url();
        }
    }

    /// The model shown by the open detail view, if any.
    pub fn detail(&self) -> Option<&FlattenedModel> {
        self.state.model_id.as_deref().and_then(|id| self.resolve(id))
    }

    pub fn reset_filters(&mut self) {
        self.state.search.clear();
        self.state.provider = ALL_PROVIDERS.to_string();
        self.state.caps.clear();
        self.state.input_modality.clear();
        self.state.output_modality.clear();
        self.state.sort = SortKey::default();
        self.state.page = 1;
        self.sync_url();
    }

    /// The current filtered/sorted page. Clamps the page number against the
    /// live result count first, rewriting the URL if the clamp moved it.
    pub fn current_view(&mut self) -> QueryResult<'_> {
        let pages = total_pages(self.filtered_count(), self.page_size);
        if self.state.page > pages {
            self.state.page = pages;
            self.sync_url();
        }
        run_query(&self.models, &self.state, self.page_size)
    }

    fn resolve(&self, model_id: &str) -> Option<&FlattenedModel> {
        self.models.iter().find(|m| m.id() == model_id)
    }

    fn filtered_count(&self) -> usize {
        self.models
            .iter()
            .filter(|m| matches_filters(m, &self.state))
            .count()
    }

    /// Drop selections the current dataset cannot satisfy, so the canonical
    /// state (and therefore the URL) reflects reality. A no-op while the
    /// dataset is still loading.
    fn reconcile(&mut self) {
        if self.load != LoadState::Ready {
            return;
        }

        if self.state.provider != ALL_PROVIDERS
            && !self.providers.iter().any(|p| p.id == self.state.provider)
        {
            log::debug!("dropping stale provider selection {}", self.state.provider);
            self.state.provider = ALL_PROVIDERS.to_string();
        }

        let inputs = &self.input_modalities;
        self.state.input_modality.retain(|m| inputs.contains(m));
        let outputs = &self.output_modalities;
        self.state.output_modality.retain(|m| outputs.contains(m));

        if let Some(id) = self.state.model_id.clone() {
            if self.resolve(&id).is_none() {
                log::debug!("deep-linked model {id} not in dataset, clearing selection");
                self.state.model_id = None;
            }
        }
    }

    /// Encode the state and reconcile it with the sink: skip if suppressed or
    /// already current, push if the search text changed since the last write,
    /// replace otherwise.
    fn sync_url(&mut self) {
        if self.skip_next_write {
            self.skip_next_write = false;
            self.last_written = Some(self.state.clone());
            return;
        }

        let next = encode(&self.state);
        let current = self.history.current_query();
        if next == current.strip_prefix('?').unwrap_or(&current) {
            self.last_written = Some(self.state.clone());
            return;
        }

        let push = self
            .last_written
            .as_ref()
            .is_some_and(|prev| prev.search != self.state.search);
        if push {
            log::trace!("history push: {next}");
            self.history.push(&next);
        } else {
            log::trace!("history replace: {next}");
            self.history.replace(&next);
        }
        self.last_written = Some(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Modalities, ModelInfo, ProviderInfo};
    use std::collections::BTreeMap;

    fn model(id: &str, last_updated: &str) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            name: id.to_uppercase(),
            last_updated: Some(last_updated.to_string()),
            modalities: Some(Modalities {
                input: vec!["text".to_string()],
                output: vec!["text".to_string()],
            }),
            ..Default::default()
        }
    }

    fn provider(id: &str, name: &str, models: Vec<ModelInfo>) -> ProviderInfo {
        ProviderInfo {
            id: id.to_string(),
            name: name.to_string(),
            models: models.into_iter().map(|m| (m.id.clone(), m)).collect(),
            ..Default::default()
        }
    }

    fn two_provider_catalog() -> Catalog {
        let acme: Vec<ModelInfo> = (0..20)
            .map(|i| model(&format!("acme-{i:02}"), &format!("2024-01-{:02}", i + 1)))
            .collect();
        let zeta: Vec<ModelInfo> = (0..10)
            .map(|i| model(&format!("zeta-{i:02}"), &format!("2024-02-{:02}", i + 1)))
            .collect();

        let mut providers = BTreeMap::new();
        providers.insert("acme".to_string(), provider("acme", "Acme", acme));
        providers.insert("zeta".to_string(), provider("zeta", "Zeta", zeta));
        providers.into()
    }

    fn ready_session() -> Session<MemoryHistory> {
        let mut session = Session::new(MemoryHistory::new());
        session.set_catalog(&two_provider_catalog());
        session
    }

    #[test]
    fn test_seeds_state_from_initial_query() {
        let history = MemoryHistory::with_query("q=claude&provider=acme&page=2");
        let session = Session::new(history);
        assert_eq!(session.state().search, "claude");
        assert_eq!(session.state().provider, "acme");
        assert_eq!(session.state().page, 2);
        assert!(session.load_state().is_loading());
    }

    #[test]
    fn test_end_to_end_pagination() {
        // 30 models across 2 providers, no filters, page size 24.
        let mut session = ready_session();
        let view = session.current_view();
        assert_eq!(view.total_count, 30);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.page.len(), 24);
        // Default order is last_updated descending; zeta's February dates
        // all beat acme's January ones.
        assert_eq!(view.page[0].id(), "zeta-09");

        session.set_page(2);
        let view = session.current_view();
        assert_eq!(view.page.len(), 6);
    }

    #[test]
    fn test_set_page_clamps_to_total_pages() {
        let mut session = ready_session();
        session.set_page(10);
        assert_eq!(session.state().page, 2);
        session.set_page(0);
        assert_eq!(session.state().page, 1);
    }

    #[test]
    fn test_current_view_reclamps_after_filters_shrink() {
        let mut session = ready_session();
        session.set_page(2);
        // Narrowing to zeta leaves 10 results = 1 page, but bypass the
        // mutation API's page reset to exercise the view-side clamp.
        session.state.provider = "zeta".to_string();
        let page_len = session.current_view().page.len();
        assert_eq!(page_len, 10);
        assert_eq!(session.state().page, 1);
    }

    #[test]
    fn test_filter_mutations_reset_page() {
        let mut session = ready_session();
        session.set_page(2);
        session.set_provider("acme");
        assert_eq!(session.state().page, 1);

        session.set_page(1);
        session.toggle_capability(Capability::Reasoning);
        assert_eq!(session.state().page, 1);

        session.set_sort(SortKey::Name);
        assert_eq!(session.state().page, 1);
    }

    #[test]
    fn test_search_pushes_other_changes_replace() {
        let mut session = ready_session();
        let baseline = session.history().entries().len();

        session.set_search("gp");
        session.set_search("gpt");
        // Two search-text commits, two pushed entries.
        assert_eq!(session.history().entries().len(), baseline + 2);

        session.set_provider("acme");
        // Provider change replaces in place.
        assert_eq!(session.history().entries().len(), baseline + 2);
        assert!(session.history().current_query().contains("provider=acme"));
    }

    #[test]
    fn test_identical_state_commit_writes_nothing() {
        let mut session = ready_session();
        session.set_search("gpt");
        let entries = session.history().entries().len();
        let current = session.history().current_query();

        session.set_search("gpt");
        assert_eq!(session.history().entries().len(), entries);
        assert_eq!(session.history().current_query(), current);
    }

    #[test]
    fn test_navigation_restores_state_without_rewriting_history() {
        let mut session = ready_session();
        session.set_search("acme");
        session.set_search("acme-0");
        let entries = session.history().entries().to_vec();

        assert!(session.history.back());
        session.handle_navigation();
        assert_eq!(session.state().search, "acme");
        // The suppressed write must leave history untouched.
        assert_eq!(session.history().entries(), entries.as_slice());

        assert!(session.history.forward());
        session.handle_navigation();
        assert_eq!(session.state().search, "acme-0");
        assert_eq!(session.history().entries(), entries.as_slice());
    }

    #[test]
    fn test_stale_provider_dropped_and_url_updated() {
        let history = MemoryHistory::with_query("provider=ghost");
        let mut session = Session::new(history);
        session.set_catalog(&two_provider_catalog());

        assert_eq!(session.state().provider, ALL_PROVIDERS);
        assert!(!session.history().current_query().contains("provider"));
    }

    #[test]
    fn test_stale_modalities_dropped() {
        let history = MemoryHistory::with_query("in=text%2Csmoke&out=hologram");
        let mut session = Session::new(history);
        session.set_catalog(&two_provider_catalog());

        assert_eq!(session.state().input_modality, vec!["text"]);
        assert!(session.state().output_modality.is_empty());
    }

    #[test]
    fn test_deep_link_resolves_after_fetch() {
        let history = MemoryHistory::with_query("model=zeta-03");
        let mut session = Session::new(history);
        session.set_catalog(&two_provider_catalog());

        let detail = session.detail().unwrap();
        assert_eq!(detail.id(), "zeta-03");
    }

    #[test]
    fn test_unresolvable_deep_link_cleared() {
        let history = MemoryHistory::with_query("model=no-such-model");
        let mut session = Session::new(history);
        session.set_catalog(&two_provider_catalog());

        assert!(session.detail().is_none());
        assert_eq!(session.state().model_id, None);
        assert!(!session.history().current_query().contains("model"));
    }

    #[test]
    fn test_detail_open_close() {
        let mut session = ready_session();
        session.open_detail("acme-05");
        assert_eq!(session.detail().unwrap().id(), "acme-05");
        assert!(session.history().current_query().contains("model=acme-05"));

        session.open_detail("not-a-model");
        assert_eq!(session.detail().unwrap().id(), "acme-05");

        session.close_detail();
        assert!(session.detail().is_none());
        assert!(!session.history().current_query().contains("model"));
    }

    #[test]
    fn test_navigation_without_model_id_closes_detail() {
        let mut session = ready_session();
        session.set_search("zeta");
        session.open_detail("zeta-01");
        assert!(session.detail().is_some());

        assert!(session.history.back());
        session.handle_navigation();
        assert!(session.detail().is_none());
    }

    #[test]
    fn test_reset_filters_keeps_detail() {
        let mut session = ready_session();
        session.set_provider("acme");
        session.toggle_capability(Capability::Reasoning);
        session.open_detail("acme-01");

        session.reset_filters();
        assert!(!session.state().has_active_filters());
        assert_eq!(session.state().model_id.as_deref(), Some("acme-01"));
    }

    #[test]
    fn test_fetch_failure_is_terminal_state() {
        let mut session = Session::new(MemoryHistory::new());
        session.set_error("Failed to fetch data");
        assert_eq!(session.load_state().error(), Some("Failed to fetch data"));
        let view = session.current_view();
        assert_eq!(view.total_count, 0);
    }

    #[test]
    fn test_memory_history_push_truncates_forward() {
        let mut history = MemoryHistory::new();
        history.push("a=1");
        history.push("a=2");
        assert!(history.back());
        history.push("a=3");
        let expected: Vec<String> = vec!["".into(), "a=1".into(), "a=3".into()];
        assert_eq!(history.entries(), expected.as_slice());
        assert_eq!(history.current_query(), "a=3");
    }
}
