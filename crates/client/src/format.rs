//! Presentation helpers (en-US formatting, plain-text dashboard).

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::engine::{DisplayLoan, StatusFilter, ViewMode};

/// en-US dollar amount, e.g. `$12,500.00`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Short en-US date, e.g. `Jan 5, 2025`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_rate(rate: f64) -> String {
    format!("{rate}%")
}

pub fn loan_count_label(count: usize) -> String {
    if count == 1 {
        "Showing 1 loan".to_string()
    } else {
        format!("Showing {count} loans")
    }
}

/// Plain-text rendering of the displayed records.
///
/// Only fields present on the [`DisplayLoan`] are printed; masking has
/// already happened upstream.
pub fn render_dashboard(
    loans: &[DisplayLoan],
    mode: ViewMode,
    filter: StatusFilter,
    can_delete: bool,
) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", mode.label());
    if mode == ViewMode::All {
        let _ = write!(out, " | status: {filter}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", loan_count_label(loans.len()));

    if loans.is_empty() {
        let _ = writeln!(out, "No loans found.");
        return out;
    }

    for loan in loans {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}  [{}]  {}",
            format_currency(loan.amount),
            loan.status.label(),
            loan.id
        );
        let _ = writeln!(out, "  Borrower:  {}", loan.user_email);
        let _ = writeln!(out, "  Interest:  {}", format_rate(loan.interest_rate));
        if let Some(total) = loan.total_loan {
            let _ = writeln!(out, "  Total:     {}", format_currency(total));
        }
        let _ = writeln!(out, "  Applied:   {}", format_date(loan.application_date));
        let _ = writeln!(out, "  Maturity:  {}", format_date(loan.maturity_date));
        let _ = writeln!(out, "  Purpose:   {}", loan.purpose);
        if can_delete {
            let _ = writeln!(out, "  (delete with: loanportal delete {})", loan.id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanportal_core::LoanStatus;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_currency(12_500.0), "$12,500.00");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-5.0), "-$5.00");
    }

    #[test]
    fn dates_and_rates() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(d), "Jan 5, 2025");
        assert_eq!(format_rate(7.5), "7.5%");
        assert_eq!(format_rate(7.0), "7%");
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(loan_count_label(0), "Showing 0 loans");
        assert_eq!(loan_count_label(1), "Showing 1 loan");
        assert_eq!(loan_count_label(3), "Showing 3 loans");
    }

    fn display(total_loan: Option<f64>) -> DisplayLoan {
        DisplayLoan {
            id: "L-1".parse().unwrap(),
            user_email: "ana@example.com".to_string(),
            amount: 5000.0,
            total_loan,
            status: LoanStatus::Active,
            interest_rate: 6.25,
            maturity_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            application_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            purpose: "Inventory".to_string(),
        }
    }

    #[test]
    fn rendering_omits_withheld_total() {
        let text = render_dashboard(&[display(None)], ViewMode::All, StatusFilter::All, false);
        assert!(text.contains("Showing 1 loan"));
        assert!(!text.contains("Total:"));
        assert!(!text.contains("delete with"));

        let text = render_dashboard(&[display(Some(5400.0))], ViewMode::Expired, StatusFilter::All, true);
        assert!(text.contains("Total:     $5,400.00"));
        assert!(text.contains("loanportal delete L-1"));
        assert!(text.starts_with("Expired Loans\n"));
    }
}
