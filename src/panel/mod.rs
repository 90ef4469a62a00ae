//! Transaction admin panel: a filtered, paginated, editable view of the
//! transactions recorded at the admin's center.
//!
//! All mutable state lives in one [`PanelState`] behind an async mutex that
//! is never held across a request, so operations may overlap. Each page fetch
//! is tagged with a sequence number and only the latest one is rendered.
use chrono::{FixedOffset, Offset, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::api::model::{CenterInfo, TransactionUpdate};
use crate::api::TransactionApi;
use crate::config::Panel as PanelConfig;
use crate::display::display_offset;
use crate::model::FilterField;
use crate::notify::Notifier;
use crate::points::{parse_float, parse_int};

pub mod state;
pub mod view;

pub use state::{Applied, FetchTicket, Pagination, PanelState};
pub use view::{EditField, EditForm, PaginationView, PanelView, SummaryView, TransactionRow};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this transaction?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// Superseded by a newer fetch before it completed.
    Stale,
    Failed,
    /// No center yet, nothing was requested.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Cancelled,
    /// Nothing to act on (no open edit form).
    Ignored,
    Failed,
}

enum Step {
    Done(FetchOutcome),
    Clamped,
}

pub struct TransactionPanel<A, V, N> {
    api: A,
    view: V,
    notifier: N,
    offset: FixedOffset,
    state: Mutex<PanelState>,
}

impl<A: TransactionApi, V: PanelView, N: Notifier> TransactionPanel<A, V, N> {
    pub fn new(api: A, view: V, notifier: N, cfg: &PanelConfig) -> Self {
        let offset = display_offset(cfg.display_offset_minutes).unwrap_or_else(|| Utc.fix());
        Self {
            api,
            view,
            notifier,
            offset,
            state: Mutex::new(PanelState::new(cfg.items_per_page)),
        }
    }

    pub async fn snapshot(&self) -> PanelState {
        self.state.lock().await.clone()
    }

    /// Resolve the admin's center, then load the first page.
    #[instrument(skip_all)]
    pub async fn initialize(&self) -> FetchOutcome {
        match self.api.center_info().await {
            Ok(CenterInfo {
                success: true,
                center: Some(center),
                ..
            }) if !center.trim().is_empty() => {
                info!(%center, "admin center resolved");
                self.state.lock().await.center = Some(center);
                self.fetch_transactions().await
            }
            Ok(info) => {
                warn!(message = ?info.message, "center information unavailable");
                self.notifier.error("Failed to get center information");
                FetchOutcome::Failed
            }
            Err(err) => {
                error!(?err, "failed to get center information");
                self.notifier.error("Failed to get center information");
                FetchOutcome::Failed
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn fetch_transactions(&self) -> FetchOutcome {
        // A clamped page is re-requested once; a second clamp keeps what it got.
        for _ in 0..2 {
            match self.fetch_once().await {
                Step::Done(outcome) => return outcome,
                Step::Clamped => continue,
            }
        }
        FetchOutcome::Applied
    }

    async fn fetch_once(&self) -> Step {
        let ticket = self.state.lock().await.begin_fetch();
        let ticket = match ticket {
            Some(ticket) => ticket,
            None => {
                warn!("admin center unknown; skipping transaction fetch");
                return Step::Done(FetchOutcome::Skipped);
            }
        };
        debug!(seq = ticket.seq, page = ticket.query.page, limit = ticket.query.limit, "fetching transactions");

        let result = self.api.list_transactions(&ticket.query).await;
        let mut state = self.state.lock().await;
        match result {
            Ok(page) => match state.apply(&ticket, page) {
                Applied::Stale => {
                    debug!(seq = ticket.seq, "discarding stale transaction page");
                    Step::Done(FetchOutcome::Stale)
                }
                applied => {
                    self.render(&state);
                    info!(
                        page = state.pagination.current_page(),
                        total_pages = state.pagination.total_pages(),
                        rows = state.transactions.len(),
                        "transactions loaded"
                    );
                    if applied == Applied::PageClamped {
                        Step::Clamped
                    } else {
                        Step::Done(FetchOutcome::Applied)
                    }
                }
            },
            Err(err) => {
                if !state.is_latest(&ticket) {
                    warn!(?err, seq = ticket.seq, "superseded transaction fetch failed");
                    return Step::Done(FetchOutcome::Stale);
                }
                drop(state);
                error!(?err, "failed to fetch transactions");
                if err.is_status() {
                    self.notifier.error("Failed to fetch transactions");
                } else {
                    self.notifier
                        .error("An error occurred while fetching transactions");
                }
                Step::Done(FetchOutcome::Failed)
            }
        }
    }

    fn render(&self, state: &PanelState) {
        let pagination = &state.pagination;
        self.view.render_pagination(&PaginationView {
            label: pagination.label(),
            prev_enabled: pagination.has_prev(),
            next_enabled: pagination.has_next(),
        });
        let rows: Vec<TransactionRow> = state
            .transactions
            .iter()
            .map(|t| TransactionRow::new(t, self.offset))
            .collect();
        self.view.render_rows(&rows);
        if let Some(stats) = &state.stats {
            self.view.render_summary(&SummaryView::from(stats));
        }
    }

    /// Record a filter input; takes effect on the next fetch.
    pub async fn set_filter(&self, field: FilterField, value: impl Into<String>) {
        self.state.lock().await.filters.set(field, value);
    }

    pub async fn set_date_range(&self, start: chrono::NaiveDate, end: chrono::NaiveDate) {
        self.state.lock().await.filters.set_date_range(start, end);
    }

    pub async fn apply_filters(&self) -> FetchOutcome {
        {
            let mut state = self.state.lock().await;
            debug!(filters = ?state.filters, "applying filters");
            state.pagination.first();
        }
        self.fetch_transactions().await
    }

    pub async fn reset_filters(&self) -> FetchOutcome {
        self.view.clear_filter_inputs();
        {
            let mut state = self.state.lock().await;
            state.filters = Default::default();
            state.pagination.first();
        }
        self.fetch_transactions().await
    }

    /// Returns false, without fetching, on the first page.
    pub async fn prev_page(&self) -> bool {
        let moved = self.state.lock().await.pagination.prev();
        if moved {
            self.fetch_transactions().await;
        }
        moved
    }

    /// Returns false, without fetching, on the last page.
    pub async fn next_page(&self) -> bool {
        let moved = self.state.lock().await.pagination.next();
        if moved {
            self.fetch_transactions().await;
        }
        moved
    }

    pub async fn go_to_page(&self, page: u32) -> bool {
        let moved = self.state.lock().await.pagination.go_to(page);
        if moved {
            self.fetch_transactions().await;
        }
        moved
    }

    pub async fn set_items_per_page(&self, items_per_page: u32) -> bool {
        let changed = self
            .state
            .lock()
            .await
            .pagination
            .set_items_per_page(items_per_page);
        if !changed {
            warn!(items_per_page, "rejected page size");
            self.notifier.error("Items per page must be greater than zero");
            return false;
        }
        self.fetch_transactions().await;
        true
    }

    /// Open the edit form for a row of the current page.
    pub async fn begin_edit(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        let form = match state.find(id) {
            Some(transaction) => EditForm::new(transaction),
            None => {
                warn!(id, "edit requested for a transaction not on this page");
                return false;
            }
        };
        self.view.show_edit_modal(&form);
        state.edit = Some(form);
        true
    }

    pub async fn set_edit_field(&self, field: EditField, value: &str) -> bool {
        let mut state = self.state.lock().await;
        match state.edit.as_mut() {
            Some(form) => {
                if form.set(field, value) {
                    self.view.update_edit_points(&form.points);
                }
                true
            }
            None => false,
        }
    }

    pub async fn cancel_edit(&self) {
        self.state.lock().await.edit = None;
        self.view.hide_edit_modal();
    }

    #[instrument(skip_all)]
    pub async fn submit_edit(&self) -> ActionOutcome {
        let form = self.state.lock().await.edit.clone();
        let form = match form {
            Some(form) => form,
            None => {
                warn!("no transaction is being edited");
                return ActionOutcome::Ignored;
            }
        };
        let quantity = match parse_float(&form.quantity) {
            Some(quantity) => quantity,
            None => {
                warn!(quantity = %form.quantity, "edited quantity is not a number");
                self.notifier.error("Quantity must be a number");
                return ActionOutcome::Failed;
            }
        };
        let points = match parse_int(&form.points) {
            Some(points) => points,
            None => {
                warn!(quantity = %form.quantity, points = %form.points, "derived points out of range");
                self.notifier.error("Quantity is too large");
                return ActionOutcome::Failed;
            }
        };
        let update = TransactionUpdate {
            username: form.username.clone(),
            waste_type: form.waste_type.clone(),
            quantity,
            points,
        };

        match self
            .api
            .update_transaction(&form.transaction_id, &update)
            .await
        {
            Ok(()) => {
                info!(id = %form.transaction_id, points = update.points, "transaction updated");
                let closed = {
                    let mut state = self.state.lock().await;
                    let current = state
                        .edit
                        .as_ref()
                        .is_some_and(|open| open.transaction_id == form.transaction_id);
                    if current {
                        state.edit = None;
                    }
                    current
                };
                // Another row's form may have been opened while the request ran.
                if closed {
                    self.view.hide_edit_modal();
                }
                self.notifier.success("Transaction updated successfully");
                self.fetch_transactions().await;
                ActionOutcome::Done
            }
            Err(err) => {
                error!(?err, id = %form.transaction_id, "failed to update transaction");
                if err.is_status() {
                    self.notifier.error("Failed to update transaction");
                } else {
                    self.notifier
                        .error("An error occurred while updating the transaction");
                }
                ActionOutcome::Failed
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn delete_transaction(&self, id: &str) -> ActionOutcome {
        if !self.view.confirm(DELETE_PROMPT) {
            info!(id, "delete cancelled");
            return ActionOutcome::Cancelled;
        }
        match self.api.delete_transaction(id).await {
            Ok(()) => {
                info!(id, "transaction deleted");
                self.notifier.success("Transaction deleted successfully");
                self.fetch_transactions().await;
                ActionOutcome::Done
            }
            Err(err) => {
                error!(?err, id, "failed to delete transaction");
                if err.is_status() {
                    self.notifier.error("Failed to delete transaction");
                } else {
                    self.notifier
                        .error("An error occurred while deleting the transaction");
                }
                ActionOutcome::Failed
            }
        }
    }
}
