//! Crawl orchestration and domain model for the habindex workspace.
//!
//! This crate owns everything between the raw REST payloads of
//! `habindex-api` and the JSON artifacts consumed by downstream query
//! agents:
//!
//! - **[`Crawler`]** — One batch run: fetch the root/discovery document and
//!   the full item listing, normalize, classify, build the semantic tree,
//!   and atomically persist `index.json` + `rest_root.json`. Returns a
//!   [`RunSummary`]; per-item problems never abort the run.
//!
//! - **Domain model** ([`model`]) — Canonical [`Item`] records keyed by
//!   name, the Location → Equipment → Point [`SemanticTree`], and the
//!   persisted [`Index`] / [`RootInfo`] artifacts.
//!
//! - **[`semantics`]** — Role classification (explicit metadata, semantic
//!   tags, structural inference) and cycle-safe tree assembly over the
//!   group-membership graph.
//!
//! The whole pipeline is rebuild-from-scratch: no state survives between
//! runs, and artifacts are only replaced after a fully successful crawl.

pub mod config;
pub mod crawl;
pub mod error;
pub mod index;
pub mod model;
pub mod normalize;
pub mod semantics;
pub mod summary;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::CrawlerConfig;
pub use crawl::Crawler;
pub use error::{CrawlError, ItemIssue};
pub use index::Index;
pub use model::{EquipmentNode, Item, LocationNode, PointRef, RootInfo, SemanticFlags, SemanticTree};
pub use summary::RunSummary;
