use std::cmp::Ordering;

use crate::catalog::{FlattenedModel, ModelInfo};
use crate::state::ViewState;

/// A boolean model feature that can be filtered on.
///
/// Declaration order is the canonical serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Reasoning,
    ToolCall,
    StructuredOutput,
    Attachment,
    OpenWeights,
}

/// All capabilities in canonical order.
pub const CAPABILITIES: [Capability; 5] = [
    Capability::Reasoning,
    Capability::ToolCall,
    Capability::StructuredOutput,
    Capability::Attachment,
    Capability::OpenWeights,
];

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Reasoning => "reasoning",
            Capability::ToolCall => "tool_call",
            Capability::StructuredOutput => "structured_output",
            Capability::Attachment => "attachment",
            Capability::OpenWeights => "open_weights",
        }
    }

    /// Parse a capability token; unknown tokens yield `None` rather than an
    /// error so URL decoding stays permissive.
    pub fn parse(token: &str) -> Option<Self> {
        CAPABILITIES.iter().copied().find(|c| c.as_str() == token)
    }

    pub fn enabled_on(&self, model: &ModelInfo) -> bool {
        match self {
            Capability::Reasoning => model.reasoning,
            Capability::ToolCall => model.tool_call,
            Capability::StructuredOutput => model.structured_output,
            Capability::Attachment => model.attachment,
            Capability::OpenWeights => model.open_weights,
        }
    }
}

/// The active result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    LastUpdated,
    ReleaseDate,
    Name,
    NameDesc,
    ContextSize,
    InputCost,
    InputCostDesc,
    OutputCost,
    OutputCostDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::LastUpdated => "lastUpdated",
            SortKey::ReleaseDate => "releaseDate",
            SortKey::Name => "name",
            SortKey::NameDesc => "nameDesc",
            SortKey::ContextSize => "contextSize",
            SortKey::InputCost => "inputCost",
            SortKey::InputCostDesc => "inputCostDesc",
            SortKey::OutputCost => "outputCost",
            SortKey::OutputCostDesc => "outputCostDesc",
        }
    }

    /// Parse a sort identifier, falling back to the default for anything
    /// unrecognized.
    pub fn parse(token: &str) -> Self {
        SortKey::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == token)
            .unwrap_or_default()
    }

    pub fn all() -> [SortKey; 9] {
        [
            SortKey::LastUpdated,
            SortKey::ReleaseDate,
            SortKey::Name,
            SortKey::NameDesc,
            SortKey::ContextSize,
            SortKey::InputCost,
            SortKey::InputCostDesc,
            SortKey::OutputCost,
            SortKey::OutputCostDesc,
        ]
    }
}

/// One page of results plus the counts a caller needs for pagination UI.
#[derive(Debug)]
pub struct QueryResult<'a> {
    pub page: Vec<&'a FlattenedModel>,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Whether a flattened model passes every active filter clause.
///
/// Clauses are AND-ed. Search is an OR across name/id/family/provider name;
/// capability and modality selections require every chosen value to hold.
pub fn matches_filters(flat: &FlattenedModel, state: &ViewState) -> bool {
    let search = state.search.trim().to_lowercase();
    if !search.is_empty() {
        let hit = flat.model.name.to_lowercase().contains(&search)
            || flat.model.id.to_lowercase().contains(&search)
            || flat
                .model
                .family
                .as_deref()
                .is_some_and(|f| f.to_lowercase().contains(&search))
            || flat.provider_name.to_lowercase().contains(&search);
        if !hit {
            return false;
        }
    }

    if state.provider != crate::state::ALL_PROVIDERS && flat.provider_id != state.provider {
        return false;
    }

    if !state.caps.iter().all(|cap| cap.enabled_on(&flat.model)) {
        return false;
    }

    let inputs = flat.model.input_modalities();
    if !state
        .input_modality
        .iter()
        .all(|m| inputs.iter().any(|have| have == m))
    {
        return false;
    }

    let outputs = flat.model.output_modalities();
    if !state
        .output_modality
        .iter()
        .all(|m| outputs.iter().any(|have| have == m))
    {
        return false;
    }

    true
}

// Case-insensitive name ordering with a raw tie-break so equal-ignoring-case
// names still sort deterministically.
fn name_cmp(a: &FlattenedModel, b: &FlattenedModel) -> Ordering {
    a.model
        .name
        .to_lowercase()
        .cmp(&b.model.name.to_lowercase())
        .then_with(|| a.model.name.cmp(&b.model.name))
}

fn sort_models(models: &mut [&FlattenedModel], key: SortKey) {
    match key {
        SortKey::LastUpdated => models.sort_by(|a, b| {
            b.model.last_updated_key().cmp(a.model.last_updated_key())
        }),
        SortKey::ReleaseDate => models.sort_by(|a, b| {
            b.model.release_date_key().cmp(a.model.release_date_key())
        }),
        SortKey::Name => models.sort_by(|a, b| name_cmp(a, b)),
        SortKey::NameDesc => models.sort_by(|a, b| name_cmp(b, a)),
        SortKey::ContextSize => models.sort_by(|a, b| {
            b.model
                .context_limit()
                .unwrap_or(0)
                .cmp(&a.model.context_limit().unwrap_or(0))
        }),
        // Ascending cost: missing cost sorts last via the +infinity sentinel.
        SortKey::InputCost => models.sort_by(|a, b| {
            a.model
                .input_cost()
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.model.input_cost().unwrap_or(f64::INFINITY))
        }),
        SortKey::OutputCost => models.sort_by(|a, b| {
            a.model
                .output_cost()
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.model.output_cost().unwrap_or(f64::INFINITY))
        }),
        // Descending cost: missing cost uses a 0 sentinel, so it ties with
        // free models instead of staying distinct as it does ascending. That
        // asymmetry is inherited behavior and kept on purpose.
        SortKey::InputCostDesc => models.sort_by(|a, b| {
            b.model
                .input_cost()
                .unwrap_or(0.0)
                .total_cmp(&a.model.input_cost().unwrap_or(0.0))
        }),
        SortKey::OutputCostDesc => models.sort_by(|a, b| {
            b.model
                .output_cost()
                .unwrap_or(0.0)
                .total_cmp(&a.model.output_cost().unwrap_or(0.0))
        }),
    }
}

/// Number of pages for a filtered count, never less than one.
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    total_count.div_ceil(page_size).max(1)
}

/// Run the full filter→sort→paginate pipeline.
///
/// The requested page is taken as-is; out-of-range pages yield an empty
/// slice. Clamping against `total_pages` is the caller's job.
pub fn run_query<'a>(
    models: &'a [FlattenedModel],
    state: &ViewState,
    page_size: usize,
) -> QueryResult<'a> {
    let mut filtered: Vec<&FlattenedModel> =
        models.iter().filter(|m| matches_filters(m, state)).collect();

    sort_models(&mut filtered, state.sort);

    let total_count = filtered.len();
    // Decode enforces no upper bound on the page number, so the offset
    // arithmetic must saturate instead of overflowing.
    let start = state.page.saturating_sub(1).saturating_mul(page_size);
    let page = filtered.into_iter().skip(start).take(page_size).collect();

    QueryResult {
        page,
        total_count,
        total_pages: total_pages(total_count, page_size),
    }
}
