//! One-shot crawl orchestration.
//!
//! The pipeline is sequential: root document, item listing, normalization,
//! optional per-item detail enrichment (the only parallel stage), role
//! classification, tree assembly, atomic persistence. The process owns no
//! state between runs — an aborted run has no user-visible effect because
//! artifacts are only replaced at the very end.

use std::fs;
use std::time::{Duration, Instant};

use futures_util::stream::{self, StreamExt};
use indexmap::IndexMap;
use tracing::{info, warn};

use habindex_api::{ApiError, RawItem, RestClient, Transport, with_retry};

use crate::config::CrawlerConfig;
use crate::error::{CrawlError, ItemIssue};
use crate::index::Index;
use crate::model::{Item, RootInfo};
use crate::normalize::normalize;
use crate::semantics::{build_tree, classify};
use crate::summary::RunSummary;

/// Retry budget for the listing and root document.
const LISTING_ATTEMPTS: u32 = 3;
/// Retry budget for a single per-item detail fetch.
const DETAIL_ATTEMPTS: u32 = 2;
/// Initial backoff between retry attempts; doubles per attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// One batch crawl against a configured server.
pub struct Crawler {
    config: CrawlerConfig,
    client: RestClient,
}

impl Crawler {
    /// Validate the config and build the HTTP client.
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlError> {
        config.validate()?;

        let mut transport =
            Transport::new(config.base_url.clone()).with_timeout(config.timeout);
        if let Some(ref token) = config.token {
            transport = transport.with_token(token.clone());
        }
        let client = RestClient::new(&transport)?;

        Ok(Self { config, client })
    }

    /// Run one crawl.
    ///
    /// Per-item problems are accumulated into the returned [`RunSummary`].
    /// Only three things fail the run: the root document or item listing
    /// failing with a transport-class error after retries, and not being
    /// able to write the artifacts. In every failure case the previously
    /// persisted snapshot is left untouched.
    pub async fn run(&self) -> Result<RunSummary, CrawlError> {
        let started = Instant::now();
        let mut summary = RunSummary::default();

        info!(base_url = %self.config.base_url, "crawl started");

        let root_info = self.fetch_root_info(&mut summary).await?;

        let raw_items = with_retry(LISTING_ATTEMPTS, RETRY_BACKOFF, async || {
            self.client.list_items().await
        })
        .await?;
        summary.items_listed = raw_items.len();
        info!(items = summary.items_listed, "item listing fetched");

        let mut items = normalize_all(raw_items, &mut summary);

        if self.config.fetch_details {
            self.enrich_details(&mut items, &mut summary).await;
        }

        for message in classify(&mut items) {
            summary.record(ItemIssue::Structural { message });
        }
        let outcome = build_tree(&items);
        for message in outcome.warnings {
            summary.record(ItemIssue::Structural { message });
        }
        summary.tree_roots = outcome.tree.locations.len();
        summary.tree_nodes = outcome.tree.node_count();

        fs::create_dir_all(&self.config.data_dir).map_err(|e| CrawlError::Io {
            path: self.config.data_dir.clone(),
            source: e,
        })?;
        root_info.write(&self.config.root_info_path())?;

        let index = Index::new(items.into_values().collect(), outcome.tree);
        summary.items_indexed = index.items_by_name.len();
        index.write(&self.config.index_path())?;

        summary.duration_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!("crawl finished: {}", summary.one_line());
        Ok(summary)
    }

    /// Fetch and convert the root/discovery document.
    ///
    /// Transport-class failures after retries abort the run. A body that
    /// isn't a parseable root document degrades to an empty [`RootInfo`]
    /// so the item crawl can continue with stale/missing discovery data.
    async fn fetch_root_info(&self, summary: &mut RunSummary) -> Result<RootInfo, CrawlError> {
        let result = with_retry(LISTING_ATTEMPTS, RETRY_BACKOFF, async || {
            self.client.root().await
        })
        .await;

        match result {
            Ok(resp) => Ok(RootInfo::from_response(&resp)),
            Err(ApiError::MalformedResponse { message, .. }) => {
                warn!(%message, "root document unparseable, continuing without root info");
                summary.root_info_degraded = true;
                Ok(RootInfo::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replace listing records with per-item detail records, bounded by the
    /// configured concurrency. Failures keep the listing record.
    async fn enrich_details(
        &self,
        items: &mut IndexMap<String, Item>,
        summary: &mut RunSummary,
    ) {
        let names: Vec<String> = items.keys().cloned().collect();
        info!(
            count = names.len(),
            concurrency = self.config.concurrency,
            "fetching per-item details"
        );

        let client = &self.client;
        let results: Vec<(String, Result<RawItem, ApiError>)> = stream::iter(names)
            .map(|name| async move {
                let result = with_retry(DETAIL_ATTEMPTS, RETRY_BACKOFF, async || {
                    client.item_detail(&name).await
                })
                .await;
                (name, result)
            })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        for (name, result) in results {
            match result {
                Ok(raw) => match normalize(raw) {
                    Ok(item) => {
                        items.insert(item.name.clone(), item);
                    }
                    Err(err) => summary.record(ItemIssue::DetailFetch {
                        name,
                        message: err.reason,
                    }),
                },
                Err(err) => {
                    warn!(item = %name, error = %err, "detail fetch failed, keeping listing record");
                    summary.record(ItemIssue::DetailFetch {
                        name,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

/// Normalize every raw record, skipping invalid ones with a warning.
fn normalize_all(raw: Vec<RawItem>, summary: &mut RunSummary) -> IndexMap<String, Item> {
    let mut items: IndexMap<String, Item> = IndexMap::with_capacity(raw.len());
    for record in raw {
        match normalize(record) {
            Ok(item) => {
                if let Some(prev) = items.insert(item.name.clone(), item) {
                    warn!(name = %prev.name, "duplicate item name in listing, keeping the last record");
                }
            }
            Err(err) => {
                warn!(error = %err, "skipping invalid item record");
                summary.record(ItemIssue::InvalidItem { reason: err.reason });
            }
        }
    }
    items
}
