//! Terminal renderings of the panel and signup views.
use std::io::{self, BufRead, Write};

use crate::panel::{EditForm, PaginationView, PanelView, SummaryView, TransactionRow};
use crate::signup::SignupView;
use crate::validate::Field;

#[derive(Debug, Default)]
pub struct TerminalPanelView {
    assume_yes: bool,
}

impl TerminalPanelView {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

fn cell(value: &str, width: usize) -> String {
    let shown: String = value.chars().take(width).collect();
    format!("{:<width$}", shown, width = width)
}

impl PanelView for TerminalPanelView {
    fn render_rows(&self, rows: &[TransactionRow]) {
        println!(
            "{} {} {} {} {} {}",
            cell("ID", 24),
            cell("USERNAME", 16),
            cell("DATE", 22),
            cell("WASTE TYPE", 12),
            cell("QUANTITY", 10),
            "POINTS"
        );
        if rows.is_empty() {
            println!("(no transactions)");
        }
        for row in rows {
            println!(
                "{} {} {} {} {} {}",
                cell(&row.id, 24),
                cell(&row.username, 16),
                cell(&row.date_time, 22),
                cell(&row.waste_type, 12),
                cell(&row.quantity, 10),
                row.points
            );
        }
    }

    fn render_pagination(&self, pagination: &PaginationView) {
        let prev = if pagination.prev_enabled { "< prev" } else { "      " };
        let next = if pagination.next_enabled { "next >" } else { "" };
        println!("{}  {}  {}", prev, pagination.label, next);
    }

    fn render_summary(&self, summary: &SummaryView) {
        println!(
            "Total quantity: {} kg | Total points: {} | Transactions: {}",
            summary.total_quantity, summary.total_points, summary.total_transactions
        );
    }

    fn clear_filter_inputs(&self) {}

    fn show_edit_modal(&self, form: &EditForm) {
        println!(
            "Editing {}: {} / {} / {} kg / {} points",
            form.transaction_id, form.username, form.waste_type, form.quantity, form.points
        );
    }

    fn update_edit_points(&self, points: &str) {
        println!("Points recalculated: {}", points);
    }

    fn hide_edit_modal(&self) {}

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct TerminalSignupView;

impl SignupView for TerminalSignupView {
    fn show_field_error(&self, field: Field, message: &str) {
        eprintln!("  {}: {}", field, message);
    }

    fn clear_field_error(&self, _field: Field) {}

    fn set_custom_validity(&self, field: Field, message: Option<&str>) {
        if let Some(message) = message {
            eprintln!("  {}: {}", field, message);
        }
    }

    fn set_submitting(&self, submitting: bool) {
        if submitting {
            println!("Submitting...");
        }
    }

    fn redirect(&self, target: &str) {
        println!("Continue at {}", target);
    }
}
