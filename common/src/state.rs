//! Ledger data model: buy-ins, players and the persisted/published state.
//!
//! The JSON shape (`{players, initialBuyIn, globalBuyInSet}`) is shared by
//! client-side persistence, the publish request body and the retrieve
//! response body.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::monetary::{format_plain, is_recordable, sum_amounts, within_limits, CURRENCY_SYMBOL};

/// Method recorded for the global initial buy-in and the default choice.
pub const DEFAULT_METHOD: &str = "Cash";

/// Method label that is rendered with an "(Initial)" marker and no
/// currency prefix.
pub const INITIAL_METHOD: &str = "Initial";

/// Preset method that defers to a free-text label.
pub const CUSTOM_METHOD: &str = "Custom";

/// Payment methods offered by the clients, in display order.
pub const PAYMENT_METHODS: [&str; 6] = ["Cash", "Venmo", "Zelle", "Apple Pay", "CashApp", "Custom"];

/// Resolve the method label for a preset choice plus optional free text.
///
/// `Custom` with non-blank text records the text; any other combination
/// records the preset itself.
pub fn resolve_method(preset: &str, custom: Option<&str>) -> String {
    match custom {
        Some(text) if preset == CUSTOM_METHOD && !text.trim().is_empty() => text.to_string(),
        _ => preset.to_string(),
    }
}

/// A single recorded contribution of money by a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyIn {
    /// Amount contributed, always positive once stored.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Payment method label.
    pub method: String,
}

impl BuyIn {
    /// Create a new buy-in.
    pub fn new(amount: Decimal, method: impl Into<String>) -> Self {
        Self {
            amount,
            method: method.into(),
        }
    }

    /// Check if this entry carries the literal `Initial` method.
    pub fn is_initial(&self) -> bool {
        self.method == INITIAL_METHOD
    }

    /// Line shown in buy-in lists: `$50 - Cash`, or `50 - Initial` for the
    /// literal `Initial` method (which callers annotate separately).
    pub fn label(&self) -> String {
        let prefix = if self.is_initial() { "" } else { CURRENCY_SYMBOL };
        format!("{}{} - {}", prefix, format_plain(self.amount), self.method)
    }
}

/// A player and their buy-ins in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Display name.
    pub name: String,
    /// Buy-ins, oldest first.
    #[serde(default)]
    pub buy_ins: Vec<BuyIn>,
}

impl Player {
    /// Create a player with no buy-ins.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buy_ins: Vec::new(),
        }
    }

    /// Sum of this player's buy-ins.
    pub fn total(&self) -> Decimal {
        sum_amounts(self.buy_ins.iter().map(|b| b.amount))
    }
}

/// Complete ledger state as persisted locally and published as a snapshot.
///
/// Every field defaults, so a partially written payload still loads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerState {
    /// Players in insertion order.
    pub players: Vec<Player>,
    /// Initial buy-in amount; frozen once the global buy-in is applied.
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_buy_in: Decimal,
    /// Whether the global initial buy-in has been applied.
    #[serde(rename = "globalBuyInSet")]
    pub global_buy_in_applied: bool,
}

impl LedgerState {
    /// Check if there are no players.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Total number of buy-ins across every player.
    pub fn buy_in_count(&self) -> usize {
        self.players.iter().map(|p| p.buy_ins.len()).sum()
    }

    /// Check the data-model invariants on state that did not come through
    /// the ledger's mutation API.
    pub fn validate(&self) -> Result<()> {
        if !within_limits(self.initial_buy_in) {
            return Err(TrackerError::InvalidState {
                message: format!(
                    "initial buy-in {} is negative, too large or too precise",
                    self.initial_buy_in
                ),
                field: Some("initialBuyIn".to_string()),
            });
        }

        for (p, player) in self.players.iter().enumerate() {
            if player.name.trim().is_empty() {
                return Err(TrackerError::InvalidState {
                    message: format!("player {} has a blank name", p),
                    field: Some("name".to_string()),
                });
            }

            for (i, buy_in) in player.buy_ins.iter().enumerate() {
                if !is_recordable(buy_in.amount) {
                    return Err(TrackerError::InvalidState {
                        message: format!(
                            "buy-in {} of player {} has out-of-range amount {}",
                            i, p, buy_in.amount
                        ),
                        field: Some("amount".to_string()),
                    });
                }
                if buy_in.method.trim().is_empty() {
                    return Err(TrackerError::InvalidState {
                        message: format!("buy-in {} of player {} has a blank method", i, p),
                        field: Some("method".to_string()),
                    });
                }
            }
        }

        Ok(())
    }
}
