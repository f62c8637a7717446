//! modeldeck is the query/state engine behind a models.dev catalog browser.
//!
//! # Overview
//! The upstream dataset is a nested provider→model map. This crate flattens
//! it, runs the search/filter/sort/paginate pipeline over the flattened list,
//! and keeps the live view state bidirectionally synchronized with a URL
//! query string, including history back/forward navigation. It supports:
//!
//! - Flattening with per-model provider-override fallback
//! - A permissive, canonicalizing URL state codec
//! - AND-composed filter clauses with nine sort orders
//! - Push/replace history discipline with navigation-write suppression
//!
//! # Architecture
//! The crate is organized into modules that mirror the data flow: raw catalog
//! in, flattened list, query over it, state synchronization around it.

/// Catalog types, the flattener, and the fetch/session-cache registry
pub mod catalog;

/// Error types and handling
pub mod error;

/// The filter→sort→paginate pipeline
pub mod query;

/// View state, the URL codec, and the history synchronizer
pub mod state;

pub use catalog::{Catalog, FlattenedModel};
pub use error::CatalogError;
pub use query::{CAPABILITIES, Capability, QueryResult, SortKey};
pub use state::{HistorySink, LoadState, MemoryHistory, Session, ViewState};

/// Models shown per page.
pub const PAGE_SIZE: usize = 24;
