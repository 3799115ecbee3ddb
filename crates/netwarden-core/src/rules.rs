// ── Paginated rules controller ──
//
// State machine over the visible page of the rules collection. Four
// triggers, all explicit: search changed, page changed, mutation
// committed, refresh tick. Every trigger resolves to a fetch of the
// current `(page, search)` pair; nothing refetches implicitly.
//
// Mutations are never applied optimistically. The local rows are a
// read-through cache of the current page and change only when a fetch
// succeeds; a failed fetch leaves the previous page visible.

use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use crate::error::{CoreError, Result};
use crate::model::{PageState, RuleKind, RulesPage};
use crate::poller::PollTask;

/// The slice of the backend surface the controller needs. Implemented
/// for [`netwarden_api::BackendClient`]; tests substitute an in-memory
/// collection.
pub trait RulesBackend: Send + Sync + 'static {
    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        search: &str,
    ) -> impl Future<Output = Result<RulesPage>> + Send;

    fn toggle_rule(&self, id: &str, enabled: bool) -> impl Future<Output = Result<()>> + Send;

    fn delete_rule(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    fn add_rule(&self, pattern: &str, kind: RuleKind) -> impl Future<Output = Result<()>> + Send;
}

impl RulesBackend for netwarden_api::BackendClient {
    async fn fetch_page(&self, page: u32, page_size: u32, search: &str) -> Result<RulesPage> {
        let response = self.get_rules_paginated(page, page_size, search).await?;
        Ok(response.into())
    }

    async fn toggle_rule(&self, id: &str, enabled: bool) -> Result<()> {
        self.toggle_rule(id, enabled).await.map_err(|err| {
            if err.is_not_found() {
                CoreError::RuleNotFound { id: id.to_owned() }
            } else {
                err.into()
            }
        })
    }

    async fn delete_rule(&self, id: &str) -> Result<()> {
        self.delete_rule(id).await.map_err(|err| {
            if err.is_not_found() {
                CoreError::RuleNotFound { id: id.to_owned() }
            } else {
                err.into()
            }
        })
    }

    async fn add_rule(&self, pattern: &str, kind: RuleKind) -> Result<()> {
        Ok(self.add_rule(pattern, &kind.to_string()).await?)
    }
}

/// Controller over one server-side paginated view of the rules
/// collection.
///
/// All methods take `&mut self`, which is what coalesces overlapping
/// triggers: a refresh tick and a mutation-committed refresh for the
/// same `(page, search)` can never race, they serialize.
#[derive(Debug)]
pub struct RulesController<B: RulesBackend> {
    backend: B,
    state: PageState,
}

impl<B: RulesBackend> RulesController<B> {
    pub fn new(backend: B, page_size: u32) -> Self {
        Self {
            backend,
            state: PageState::new(page_size),
        }
    }

    /// The current page as last successfully fetched.
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Change the search term. Resets to page 1 and refetches; a
    /// no-op when the term is unchanged.
    pub async fn set_search(&mut self, term: &str) -> Result<()> {
        if self.state.search_term == term {
            return Ok(());
        }
        self.state.search_term = term.to_owned();
        self.state.page_number = 1;
        self.refresh().await
    }

    /// Jump to an explicit page, clamped to `[1, totalPages]`.
    pub async fn set_page(&mut self, page: u32) -> Result<()> {
        let target = page.clamp(1, self.state.total_pages().max(1));
        if target == self.state.page_number {
            return Ok(());
        }
        self.state.page_number = target;
        self.refresh().await
    }

    pub async fn next_page(&mut self) -> Result<()> {
        if self.state.has_next_page() {
            self.set_page(self.state.page_number + 1).await
        } else {
            Ok(())
        }
    }

    pub async fn prev_page(&mut self) -> Result<()> {
        if self.state.has_prev_page() {
            self.set_page(self.state.page_number - 1).await
        } else {
            Ok(())
        }
    }

    /// Refetch the current `(page, search)` pair.
    ///
    /// On success the rows and total replace the cache wholesale. If
    /// the fetch reveals the page no longer exists (a deletion shrank
    /// the collection), the page number clamps to the last real page
    /// and one follow-up fetch fills it. On failure the previous page
    /// stays visible and the error is returned.
    pub async fn refresh(&mut self) -> Result<()> {
        let fetched = self
            .backend
            .fetch_page(
                self.state.page_number,
                self.state.page_size,
                &self.state.search_term,
            )
            .await?;
        self.apply_page(fetched);

        let last_page = self.state.total_pages().max(1);
        if self.state.page_number > last_page {
            // Clamp only once the replacement page is in hand, so a
            // failed follow-up never leaves the page number and the
            // rows disagreeing.
            let refetched = self
                .backend
                .fetch_page(last_page, self.state.page_size, &self.state.search_term)
                .await?;
            self.state.page_number = last_page;
            self.apply_page(refetched);
        }
        Ok(())
    }

    fn apply_page(&mut self, page: RulesPage) {
        self.state.total_items = page.total_items;
        self.state.rows = page.rows;
    }

    /// Flip a rule's enabled flag on the backend, then refetch.
    ///
    /// The target state is derived from the cached row; acting on a
    /// row that is no longer on the current page is an error rather
    /// than a guess.
    pub async fn toggle_rule(&mut self, id: &str) -> Result<()> {
        let enabled = self
            .state
            .rows
            .iter()
            .find(|rule| rule.id == id)
            .map(|rule| rule.enabled)
            .ok_or_else(|| CoreError::RuleNotFound { id: id.to_owned() })?;

        self.backend.toggle_rule(id, !enabled).await?;
        self.refresh().await
    }

    /// Delete a rule on the backend, then refetch (clamping the page
    /// if the deletion emptied it).
    pub async fn delete_rule(&mut self, id: &str) -> Result<()> {
        self.backend.delete_rule(id).await?;
        self.refresh().await
    }

    /// Create a rule, then refetch the current page.
    pub async fn add_rule(&mut self, pattern: &str, kind: RuleKind) -> Result<()> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(CoreError::InvalidPattern {
                reason: "pattern is empty".to_owned(),
            });
        }
        self.backend.add_rule(pattern, kind).await?;
        self.refresh().await
    }
}

/// Periodic refresh of the visible page, for driving with a
/// [`Poller`](crate::poller::Poller).
///
/// Holds the controller behind an async mutex so the view and the
/// refresh schedule share it; the lock is what keeps a tick from
/// overlapping a user-triggered fetch.
#[derive(Debug, Clone)]
pub struct RulesRefreshTask<B: RulesBackend> {
    controller: Arc<tokio::sync::Mutex<RulesController<B>>>,
}

impl<B: RulesBackend> RulesRefreshTask<B> {
    pub fn new(controller: Arc<tokio::sync::Mutex<RulesController<B>>>) -> Self {
        Self { controller }
    }
}

impl<B: RulesBackend> PollTask for RulesRefreshTask<B> {
    fn tick(&mut self) -> impl Future<Output = ()> + Send {
        let controller = Arc::clone(&self.controller);
        async move {
            let mut guard = controller.lock().await;
            if let Err(err) = guard.refresh().await {
                // Stale rows stay visible; the next tick retries.
                warn!(error = %err, "rules refresh failed");
            }
        }
    }
}
