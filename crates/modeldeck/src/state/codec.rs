use url::form_urlencoded;

use super::{ALL_PROVIDERS, ViewState};
use crate::query::{CAPABILITIES, SortKey};

mod keys {
    pub const SEARCH: &str = "q";
    pub const PROVIDER: &str = "provider";
    pub const CAPS: &str = "caps";
    /// Legacy repeated-value spelling of the capability filter.
    pub const CAP: &str = "cap";
    pub const INPUT_MODALITY: &str = "in";
    pub const OUTPUT_MODALITY: &str = "out";
    pub const SORT: &str = "sort";
    pub const PAGE: &str = "page";
    pub const MODEL: &str = "model";
}

fn parse_page(value: &str) -> usize {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => n,
        _ => 1,
    }
}

fn split_csv(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|v| !v.is_empty())
}

/// Decode a query string into a view state.
///
/// Decoding is permissive: unknown capability/sort tokens fall away or fall
/// back to defaults, a bad page number becomes 1, and the capability filter
/// accepts both the csv `caps` key and the legacy repeated `cap` key, unioned
/// and deduplicated into canonical declaration order.
pub fn decode(query: &str) -> ViewState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = ViewState::new();
    let mut cap_tokens: Vec<String> = Vec::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            keys::SEARCH => state.search = value.into_owned(),
            keys::PROVIDER if !value.is_empty() => state.provider = value.into_owned(),
            keys::CAPS => cap_tokens.extend(split_csv(&value).map(str::to_string)),
            keys::CAP if !value.trim().is_empty() => cap_tokens.push(value.trim().to_string()),
            keys::INPUT_MODALITY => {
                state.input_modality = split_csv(&value).map(str::to_string).collect()
            }
            keys::OUTPUT_MODALITY => {
                state.output_modality = split_csv(&value).map(str::to_string).collect()
            }
            keys::SORT => state.sort = SortKey::parse(&value),
            keys::PAGE => state.page = parse_page(&value),
            keys::MODEL if !value.is_empty() => state.model_id = Some(value.into_owned()),
            _ => {}
        }
    }

    state.caps = CAPABILITIES
        .into_iter()
        .filter(|cap| cap_tokens.iter().any(|t| t == cap.as_str()))
        .collect();

    state
}

/// Encode a view state as a query string, omitting default-valued fields.
///
/// The empty state encodes to the empty string. Capabilities are written as
/// one csv value in canonical declaration order regardless of selection
/// order; modality lists keep the caller's order.
pub fn encode(state: &ViewState) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());

    let search = state.search.trim();
    if !search.is_empty() {
        params.append_pair(keys::SEARCH, search);
    }
    if state.provider != ALL_PROVIDERS {
        params.append_pair(keys::PROVIDER, &state.provider);
    }
    if !state.caps.is_empty() {
        let caps: Vec<&str> = CAPABILITIES
            .into_iter()
            .filter(|cap| state.caps.contains(cap))
            .map(|cap| cap.as_str())
            .collect();
        params.append_pair(keys::CAPS, &caps.join(","));
    }
    if !state.input_modality.is_empty() {
        params.append_pair(keys::INPUT_MODALITY, &state.input_modality.join(","));
    }
    if !state.output_modality.is_empty() {
        params.append_pair(keys::OUTPUT_MODALITY, &state.output_modality.join(","));
    }
    if state.sort != SortKey::default() {
        params.append_pair(keys::SORT, state.sort.as_str());
    }
    if state.page != 1 {
        params.append_pair(keys::PAGE, &state.page.to_string());
    }
    if let Some(model_id) = &state.model_id {
        params.append_pair(keys::MODEL, model_id);
    }

    params.finish()
}
