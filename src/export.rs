//! Plain-text rendering of a settlement plan for sharing.

use crate::settlement::{Transfer, TransferPlan};
use std::fmt::Write;

/// Presentation settings for [`render_transfers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// First line of the text.
    pub header: String,

    /// Appended directly after every amount, e.g. a currency sign.
    pub unit: String,

    /// Last line of the text.
    pub closing_note: String,

    /// Inserted between groups of three digits.
    pub thousands_separator: char,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            header: "[Settlement]".to_string(),
            unit: String::new(),
            closing_note: "Thanks for playing!".to_string(),
            thousands_separator: ',',
        }
    }
}

/// Formats one transfer as `<from> -> <to> : <amount><unit>`.
pub fn render_transfer(transfer: &Transfer, options: &ExportOptions) -> String {
    format!(
        "{} -> {} : {}{}",
        transfer.from,
        transfer.to,
        transfer.amount.grouped(options.thousands_separator),
        options.unit
    )
}

/// Renders the whole plan: header, one line per transfer, closing note.
///
/// Returns `None` when there is nothing to settle.
pub fn render_transfers(plan: &TransferPlan, options: &ExportOptions) -> Option<String> {
    if plan.is_empty() {
        return None;
    }

    let mut text = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(text, "{}", options.header);
    text.push('\n');
    for transfer in plan {
        let _ = writeln!(text, "{}", render_transfer(transfer, options));
    }
    text.push('\n');
    text.push_str(&options.closing_note);

    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::player::PlayerId;

    fn transfer(from: &str, to: &str, amount: i64) -> Transfer {
        Transfer {
            from: from.to_string(),
            to: to.to_string(),
            from_id: PlayerId::new(from),
            to_id: PlayerId::new(to),
            amount: Money::from(amount),
        }
    }

    #[test]
    fn test_render_single_line() {
        let line = render_transfer(&transfer("Bo", "Ann", 1500), &ExportOptions::default());
        assert_eq!(line, "Bo -> Ann : 1,500");
    }

    #[test]
    fn test_render_plan() {
        let plan = vec![transfer("Bo", "Ann", 1000), transfer("Cy", "Ann", 500)];
        let text = render_transfers(&plan, &ExportOptions::default()).unwrap();

        assert_eq!(
            text,
            "[Settlement]\n\nBo -> Ann : 1,000\nCy -> Ann : 500\n\nThanks for playing!"
        );
    }

    #[test]
    fn test_render_with_custom_options() {
        let options = ExportOptions {
            header: "Payouts".to_string(),
            unit: " KRW".to_string(),
            closing_note: "Done".to_string(),
            thousands_separator: '.',
        };
        let text = render_transfers(&vec![transfer("A", "B", 1234567)], &options).unwrap();

        assert!(text.starts_with("Payouts\n"));
        assert!(text.contains("A -> B : 1.234.567 KRW\n"));
        assert!(text.ends_with("Done"));
    }

    #[test]
    fn test_render_empty_plan() {
        assert_eq!(render_transfers(&Vec::new(), &ExportOptions::default()), None);
    }
}
