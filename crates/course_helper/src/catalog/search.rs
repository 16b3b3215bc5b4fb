//! Debounced catalog search.
//!
//! Every call to [`SearchDebouncer::input`] aborts the previous search task,
//! whether it is still waiting out the debounce window or already waiting on
//! the server, so only the latest query can publish a result.

use super::client::CatalogSource;
use super::query::{CatalogPage, CatalogQuery, DEFAULT_LIMIT};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Client-side search settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub debounce: Duration,
    pub limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            debounce: Duration::from_millis(300),
            limit: DEFAULT_LIMIT,
        }
    }
}

/// What the search box should currently show.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Loading { query: CatalogQuery },
    Ready { query: CatalogQuery, page: CatalogPage },
    Failed { query: CatalogQuery, message: String },
}

pub struct SearchDebouncer<S: CatalogSource> {
    source: Arc<S>,
    debounce: Duration,
    limit: u32,
    pending: Option<JoinHandle<()>>,
    state: watch::Sender<SearchState>,
}

impl<S: CatalogSource> SearchDebouncer<S> {
    pub fn new(source: Arc<S>, debounce: Duration, limit: u32) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            source,
            debounce,
            limit,
            pending: None,
            state,
        }
    }

    pub fn with_config(source: Arc<S>, config: &SearchConfig) -> Self {
        Self::new(source, config.debounce, config.limit)
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Handles a keystroke: searches the first page for `text`.
    pub fn input(&mut self, text: &str) {
        self.search(CatalogQuery::new(text, 1, self.limit as i64));
    }

    /// Schedules `query` after the debounce window, replacing any pending search.
    ///
    /// Must be called from within a tokio runtime.
    pub fn search(&mut self, query: CatalogQuery) {
        self.cancel();

        let source = self.source.clone();
        let state = self.state.clone();
        let debounce = self.debounce;

        debug!(q = %query.q, page = query.page, "Scheduling catalog search");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            state.send_replace(SearchState::Loading {
                query: query.clone(),
            });

            let next = match source.fetch(query.clone()).await {
                Ok(page) => {
                    info!(q = %query.q, total = page.total, "Catalog search finished");
                    SearchState::Ready { query, page }
                }
                Err(e) => {
                    warn!(q = %query.q, error = %e, "Catalog search failed");
                    SearchState::Failed {
                        query,
                        message: e.to_string(),
                    }
                }
            };
            state.send_replace(next);
        }));
    }

    /// Aborts the pending search, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<S: CatalogSource> Drop for SearchDebouncer<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
