//! # Glass Catalog
//!
//! The catalog service behind a glass manufacturer's website: a JSON API that
//! filters and paginates product lines and reference projects, server-rendered
//! listing pages, and the client-side list controller that drives infinite
//! scroll and numbered pagination against that API.
//!
//! # Architecture
//!
//! ```text
//!  catalog.toml ─▶ Catalog ─▶ filter ─▶ paginate ─▶ ListResult ─▶ Envelope (JSON)
//!                               ▲                        │
//!  query string ─▶ params ──────┘                        └──▶ render (HTML)
//!
//!  ListController ──FetchRequest──▶ PageSource (HTTP or in-process)
//!        ▲                                   │
//!        └────────on_success / on_failure────┘
//! ```
//!
//! The catalog is loaded once and never mutated, so request handling is a
//! pure function of the catalog and the query string. The controller is
//! sans-IO: it decides *what* to fetch and [`client::drive`] does the fetching,
//! which is what lets the controller's state machine be tested without a
//! runtime.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Product` and `Project` records and their JSON field names |
//! | [`catalog`] | Loading and validating the in-memory catalog; lookups |
//! | [`filter`] | Product and project matching rules; facet extraction |
//! | [`paginate`] | Page slicing, page metadata, numbered-page window |
//! | [`params`] | Query-string parsing with defaults and clamping; listing URLs |
//! | [`query`] | Filter + paginate + response envelope |
//! | [`server`] | axum router, handlers, graceful shutdown |
//! | [`controller`] | Client list state machine: accumulate and replace modes |
//! | [`client`] | `PageSource` seam, HTTP client, in-process source |
//! | [`render`] | Maud HTML for cards, listing pages, pagination |
//! | [`config`] | `config.toml` loading, merging, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Filtering Dialects
//!
//! Products and projects deliberately filter differently. Product `category`
//! and `type` are exact, case-sensitive labels, and a missing parameter means
//! "any". Project `category` is case-insensitive, defaults to `all`, and
//! matches any of a project's categories. Both searches are case-insensitive
//! substring matches, but project search also covers location and categories.
//!
//! ## Lenient Parameters
//!
//! No query string is ever rejected. Unparseable numbers fall back to their
//! defaults and out-of-range ones are clamped, so a hand-edited URL always
//! renders something.
//!
//! ## Tickets Over Cancellation
//!
//! A superseded request is not cancelled; its response is simply recognised
//! as stale by its ticket and dropped. This works identically for HTTP and
//! in-process sources and needs no cooperation from the transport.

pub mod catalog;
pub mod client;
pub mod config;
pub mod controller;
pub mod filter;
pub mod output;
pub mod paginate;
pub mod params;
pub mod query;
pub mod render;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `git describe` of the build, or `unknown`.
pub const BUILD: &str = env!("GIT_DESCRIBE");

/// Version shown by `--version`.
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_DESCRIBE"), ")");
