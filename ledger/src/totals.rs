//! Derived totals.

use rust_decimal::Decimal;
use serde::Serialize;

use buyin_common::{format_big_blind, format_money, sum_amounts};

/// Per-method sums in the order each method was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodTotals {
    entries: Vec<(String, Decimal)>,
}

impl MethodTotals {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `method`, appending the method if unseen.
    pub fn add(&mut self, method: &str, amount: Decimal) {
        match self.entries.iter_mut().find(|(m, _)| m == method) {
            Some((_, total)) => *total = sum_amounts([*total, amount]),
            None => self.entries.push((method.to_string(), amount)),
        }
    }

    /// Sum recorded for `method`, if any buy-in used it.
    pub fn get(&self, method: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, total)| *total)
    }

    /// Iterate `(method, total)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(m, t)| (m.as_str(), *t))
    }

    /// Method labels in first-seen order.
    pub fn methods(&self) -> Vec<&str> {
        self.entries.iter().map(|(m, _)| m.as_str()).collect()
    }

    /// Sum over every method.
    pub fn total(&self) -> Decimal {
        sum_amounts(self.entries.iter().map(|(_, t)| *t))
    }

    /// Number of distinct methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no buy-ins were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Overview of a ledger: everything the totals table shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Sum of every buy-in.
    pub total_in_play: Decimal,
    /// Per-method sums.
    pub by_method: MethodTotals,
    /// `(name, total)` for each player in insertion order.
    pub player_totals: Vec<(String, Decimal)>,
    /// Suggested big blind, zero when nothing is in play.
    pub suggested_big_blind: Decimal,
}

impl LedgerSummary {
    /// Render the overview as plain text lines.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Total in play: {}\n", format_money(self.total_in_play)));
        for (method, total) in self.by_method.iter() {
            out.push_str(&format!("  {}: {}\n", method, format_money(total)));
        }
        out.push_str(&format!(
            "Optimal BB (Total): {}\n",
            format_big_blind(self.suggested_big_blind)
        ));
        for (name, total) in &self.player_totals {
            out.push_str(&format!("{}: {}\n", name, format_money(*total)));
        }
        out
    }
}
