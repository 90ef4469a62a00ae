use chrono::FixedOffset;

use crate::display::format_timestamp;
use crate::model::{Stats, Transaction};
use crate::points::{calculate_points, format_fixed, format_number};

/// One rendered table row. `id` backs the row's Edit/Delete actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub id: String,
    pub username: String,
    pub date_time: String,
    pub waste_type: String,
    pub quantity: String,
    pub points: String,
}

impl TransactionRow {
    pub fn new(t: &Transaction, offset: FixedOffset) -> Self {
        Self {
            id: t.id.clone(),
            username: t.username.clone(),
            date_time: format_timestamp(&t.created_at, offset),
            waste_type: t.waste_type.clone(),
            quantity: t.quantity.to_string(),
            points: t.points.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub total_quantity: String,
    pub total_points: String,
    pub total_transactions: String,
}

impl From<&Stats> for SummaryView {
    fn from(stats: &Stats) -> Self {
        Self {
            total_quantity: format_fixed(stats.total_quantity, 2),
            total_points: format_number(stats.total_points),
            total_transactions: stats.total_transactions.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Username,
    WasteType,
    Quantity,
}

/// Contents of the edit modal. `points` is always derived, never typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub transaction_id: String,
    pub username: String,
    pub waste_type: String,
    pub quantity: String,
    pub points: String,
}

impl EditForm {
    pub fn new(t: &Transaction) -> Self {
        Self {
            transaction_id: t.id.clone(),
            username: t.username.clone(),
            waste_type: t.waste_type.to_lowercase(),
            quantity: t.quantity.to_string(),
            points: t.points.to_string(),
        }
    }

    /// Update a field. Returns true when the points were recomputed.
    pub fn set(&mut self, field: EditField, value: &str) -> bool {
        match field {
            EditField::Username => {
                self.username = value.to_string();
                false
            }
            EditField::WasteType => {
                self.waste_type = value.to_string();
                self.recompute_points();
                true
            }
            EditField::Quantity => {
                self.quantity = value.to_string();
                self.recompute_points();
                true
            }
        }
    }

    fn recompute_points(&mut self) {
        self.points = format_number(calculate_points(&self.waste_type, &self.quantity));
    }
}

/// Everything the transaction page displays or asks of the user.
pub trait PanelView: Send + Sync {
    fn render_rows(&self, rows: &[TransactionRow]);
    fn render_pagination(&self, pagination: &PaginationView);
    fn render_summary(&self, summary: &SummaryView);
    fn clear_filter_inputs(&self);
    fn show_edit_modal(&self, form: &EditForm);
    fn update_edit_points(&self, points: &str);
    fn hide_edit_modal(&self);
    fn confirm(&self, message: &str) -> bool;
}
