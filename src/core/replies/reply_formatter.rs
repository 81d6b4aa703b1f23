//! Natural-language replies for ledger results.
//!
//! Everything here is a pure function of already-fetched data, so the voice
//! adapter only has to pick which sentence to speak.

use crate::core::dates::Tense;
use crate::core::ledger::{BudgetInfo, ExpenseEntry};

/// Spoken in place of an info cell the sheet left blank.
const BLANK_AMOUNT: &str = "$0.00";

fn or_zero(value: &str) -> &str {
    if value.trim().is_empty() {
        BLANK_AMOUNT
    } else {
        value
    }
}

/// Joins spoken list items: `a`, `a and b`, `a, b, and c`.
pub fn spoken_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

pub fn budget_reply(label: &str, tense: Tense, info: &BudgetInfo) -> String {
    let (have, is) = match tense {
        Tense::Present => ("have", "is"),
        Tense::Past => ("had", "was"),
    };

    format!(
        "For {}, you {} spent {}, you {} {} remaining, and your total savings {} {}.",
        label,
        have,
        or_zero(&info.spent),
        have,
        or_zero(&info.remaining),
        is,
        or_zero(&info.saved)
    )
}

pub fn expenses_reply(label: &str, tense: Tense, entries: &[ExpenseEntry]) -> String {
    if entries.is_empty() {
        return format!("There are no expenses for {}", label);
    }

    let spoken: Vec<String> = entries
        .iter()
        .map(|entry| {
            if entry.amount.trim().is_empty() {
                entry.item.clone()
            } else {
                format!("{} for {}", entry.item, entry.amount)
            }
        })
        .collect();

    let verb = match (tense, entries.len()) {
        (Tense::Present, 1) => "is",
        (Tense::Past, 1) => "was",
        (Tense::Present, _) => "are",
        (Tense::Past, _) => "were",
    };

    if entries.len() == 1 {
        format!(
            "Your only expense for {} {} {}.",
            label,
            verb,
            spoken_list(&spoken)
        )
    } else {
        format!(
            "Your {} expenses for {} {} {}.",
            entries.len(),
            label,
            verb,
            spoken_list(&spoken)
        )
    }
}

pub fn expense_added_reply(item: &str, amount: &str, label: &str) -> String {
    format!(
        "Okay, I added {} for {} to your expenses for {}.",
        item, amount, label
    )
}
