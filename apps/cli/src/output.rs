//! # Output
//!
//! Plain-text rendering of command responses. `--json` bypasses this and
//! serializes the response as is.

use std::fmt::Write;

use crate::commands::auth::{LoginResponse, LogoutResponse, SignupResponse, WhoAmIResponse};
use crate::commands::catalog::{BorrowResponse, CatalogResponse, CategoriesResponse};
use crate::commands::dashboard::{DashboardView, ReadResponse, RenewResponse, ReturnResponse};
use crate::commands::fines::PayFineResponse;
use crate::state::ConfigState;

/// Something a command can print.
pub trait Report {
    fn render(&self, config: &ConfigState) -> String;
}

/// `2024-01-15T00:00:00+00:00` → `2024-01-15`
fn date_part(rfc3339: &str) -> &str {
    rfc3339.get(..10).unwrap_or(rfc3339)
}

impl Report for SignupResponse {
    fn render(&self, _config: &ConfigState) -> String {
        self.message.clone()
    }
}

impl Report for LoginResponse {
    fn render(&self, _config: &ConfigState) -> String {
        format!("{}\n{}", self.message, self.cookie)
    }
}

impl Report for LogoutResponse {
    fn render(&self, _config: &ConfigState) -> String {
        self.message.clone()
    }
}

impl Report for WhoAmIResponse {
    fn render(&self, _config: &ConfigState) -> String {
        match &self.username {
            Some(name) => name.clone(),
            None => "Not logged in.".to_string(),
        }
    }
}

impl Report for CatalogResponse {
    fn render(&self, _config: &ConfigState) -> String {
        if self.books.is_empty() {
            return "No books found.".to_string();
        }

        let mut out = String::new();
        for book in &self.books {
            let _ = writeln!(
                out,
                "{:>3}  {:<20} {:<20} {:<12} {}/{}{}",
                book.id,
                book.title,
                book.author,
                book.category,
                book.available,
                book.total,
                if book.borrowed { "  (borrowed)" } else { "" }
            );
        }
        out.trim_end().to_string()
    }
}

impl Report for CategoriesResponse {
    fn render(&self, _config: &ConfigState) -> String {
        self.categories.join("\n")
    }
}

impl Report for BorrowResponse {
    fn render(&self, _config: &ConfigState) -> String {
        self.message.clone()
    }
}

impl Report for DashboardView {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Welcome, {}", self.username);

        let _ = writeln!(out, "\nActive loans");
        if self.active_loans.is_empty() {
            let _ = writeln!(out, "  none");
        }
        for loan in &self.active_loans {
            let _ = write!(
                out,
                "  {:>3}  {:<20} due {}  renewals {}/{}",
                loan.book_id,
                loan.title,
                date_part(&loan.due_date),
                loan.renew_count,
                loan.max_renewals
            );
            if loan.fine_preview > 0 {
                let _ = write!(out, "  overdue, fine {}", config.format_major(loan.fine_preview));
            }
            out.push('\n');
        }

        let _ = writeln!(out, "\nFines");
        if self.fines.is_empty() {
            let _ = writeln!(out, "  none");
        }
        for fine in &self.fines {
            let status = match &fine.paid_at {
                Some(at) => format!("paid {}", date_part(at)),
                None if fine.paid => "paid".to_string(),
                None => "unpaid".to_string(),
            };
            let _ = writeln!(
                out,
                "  [{}] {:<20} {}  {}",
                fine.index,
                fine.title,
                config.format_major(fine.amount),
                status
            );
        }
        let _ = writeln!(
            out,
            "  pending {}  paid {}",
            config.format_money(self.summary.total_pending),
            config.format_money(self.summary.total_paid)
        );

        let _ = writeln!(out, "\nHistory");
        for loan in &self.history {
            let returned = match &loan.returned_at {
                Some(at) => format!("returned {}", date_part(at)),
                None => "out".to_string(),
            };
            let _ = writeln!(
                out,
                "  {:>3}  {:<20} borrowed {}  {}",
                loan.book_id,
                loan.title,
                date_part(&loan.borrowed_at),
                returned
            );
        }

        out.trim_end().to_string()
    }
}

impl Report for ReturnResponse {
    fn render(&self, _config: &ConfigState) -> String {
        self.message.clone()
    }
}

impl Report for RenewResponse {
    fn render(&self, _config: &ConfigState) -> String {
        match &self.receipt {
            Some(r) => format!("{} Due {}.", self.message, r.due_date.format("%Y-%m-%d")),
            None => self.message.clone(),
        }
    }
}

impl Report for ReadResponse {
    fn render(&self, _config: &ConfigState) -> String {
        format!("{}: {}", self.title, self.document)
    }
}

impl Report for PayFineResponse {
    fn render(&self, config: &ConfigState) -> String {
        match &self.receipt {
            Some(r) => format!(
                "{} {} ({})",
                self.message,
                config.format_money(r.amount),
                r.payment_id
            ),
            None => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::dashboard::{FineView, LoanView};
    use shelf_core::{FineSummary, Money};

    #[test]
    fn test_dashboard_text() {
        let view = DashboardView {
            username: "alice".to_string(),
            active_loans: vec![LoanView {
                book_id: 2,
                title: "The Great Gatsby".to_string(),
                author: "F. Scott Fitzgerald".to_string(),
                borrowed_at: "2024-01-01T00:00:00+00:00".to_string(),
                due_date: "2024-01-15T00:00:00+00:00".to_string(),
                returned: false,
                returned_at: None,
                renew_count: 1,
                max_renewals: 3,
                fine_preview: 2,
            }],
            fines: vec![FineView {
                index: 0,
                book_id: 3,
                title: "Clean Code".to_string(),
                amount: 5,
                paid: false,
                returned_at: "2024-01-01T00:00:00+00:00".to_string(),
                paid_at: None,
            }],
            summary: FineSummary {
                pending_count: 1,
                total_pending: Money::from_major(5),
                total_paid: Money::zero(),
            },
            history: Vec::new(),
        };

        let text = view.render(&ConfigState::default());
        assert!(text.starts_with("Welcome, alice"));
        assert!(text.contains("due 2024-01-15  renewals 1/3  overdue, fine ₹2"));
        assert!(text.contains("[0] Clean Code"));
        assert!(text.contains("₹5  unpaid"));
        assert!(text.contains("pending ₹5.00  paid ₹0.00"));
    }

    #[test]
    fn test_whoami_logged_out() {
        let resp = WhoAmIResponse { username: None };
        assert_eq!(resp.render(&ConfigState::default()), "Not logged in.");
    }
}
