//! Read-only presentation of a published snapshot.

use rust_decimal::Decimal;

use buyin_common::{format_plain, LedgerState, CURRENCY_SYMBOL};

/// One line of a player's buy-in list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine {
    /// `$50 - Cash`, or `50 - Initial` for the literal `Initial` method.
    pub text: String,
    /// Whether the line carries the "(Initial)" marker.
    pub initial_marker: bool,
}

/// A player's section of the read-only view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSection {
    pub name: String,
    pub total: Decimal,
    pub entries: Vec<EntryLine>,
}

/// What a shared, read-only view of a ledger shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnlyView {
    /// Player badges in insertion order.
    pub player_names: Vec<String>,
    /// Shown only when the global initial buy-in was applied.
    pub initial_buy_in: Option<Decimal>,
    /// Per-player buy-in lists.
    pub players: Vec<PlayerSection>,
}

impl ReadOnlyView {
    /// Build the view for a snapshot.
    pub fn from_state(state: &LedgerState) -> Self {
        let players = state
            .players
            .iter()
            .map(|player| PlayerSection {
                name: player.name.clone(),
                total: player.total(),
                entries: player
                    .buy_ins
                    .iter()
                    .map(|b| EntryLine {
                        text: b.label(),
                        initial_marker: b.is_initial(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            player_names: state.players.iter().map(|p| p.name.clone()).collect(),
            initial_buy_in: state
                .global_buy_in_applied
                .then_some(state.initial_buy_in),
            players,
        }
    }

    /// Render the view as plain text.
    pub fn to_text(&self) -> String {
        let mut out = String::from("Poker Buy-In Tracker (Read-Only)\n\n");

        if self.player_names.is_empty() {
            out.push_str("No players found.\n");
            return out;
        }

        out.push_str(&format!("Players: {}\n", self.player_names.join(", ")));

        if let Some(initial) = self.initial_buy_in {
            out.push_str(&format!(
                "Each player started with an initial buy-in of {}{}.\n",
                CURRENCY_SYMBOL,
                format_plain(initial)
            ));
        }

        for section in &self.players {
            out.push_str(&format!(
                "\n{} (Total: {}{})\n",
                section.name,
                CURRENCY_SYMBOL,
                format_plain(section.total)
            ));
            for entry in &section.entries {
                if entry.initial_marker {
                    out.push_str(&format!("  {} (Initial)\n", entry.text));
                } else {
                    out.push_str(&format!("  {}\n", entry.text));
                }
            }
        }

        out
    }
}
