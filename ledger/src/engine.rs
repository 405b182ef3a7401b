//! Core ledger implementation.

use rust_decimal::Decimal;
use tracing::debug;

use buyin_common::{
    is_positive, is_recordable, within_limits, BuyIn, LedgerState, Player, Result, TrackerError,
    DEFAULT_METHOD,
};

use crate::denomination::DenominationSet;
use crate::totals::{LedgerSummary, MethodTotals};

/// Why a mutation left the ledger unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Player name was empty or whitespace.
    BlankName,
    /// Payment method label was empty or whitespace.
    BlankMethod,
    /// Amount was zero or negative.
    NonPositiveAmount,
    /// Amount exceeds the recordable maximum or carries too many decimals.
    AmountOutOfRange,
    /// Initial buy-in amount was negative.
    NegativeInitialBuyIn,
    /// The global initial buy-in was already applied.
    GlobalBuyInApplied,
    /// Quick add requires the global initial buy-in.
    GlobalBuyInNotApplied,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::BlankName => "player name is blank",
            SkipReason::BlankMethod => "payment method is blank",
            SkipReason::NonPositiveAmount => "amount must be greater than zero",
            SkipReason::AmountOutOfRange => "amount is too large or has too many decimal places",
            SkipReason::NegativeInitialBuyIn => "initial buy-in cannot be negative",
            SkipReason::GlobalBuyInApplied => "initial buy-in has already been applied",
            SkipReason::GlobalBuyInNotApplied => "initial buy-in has not been applied yet",
        };
        f.write_str(text)
    }
}

/// Result of a ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The state changed.
    Applied,
    /// The input was invalid and the state is unchanged.
    Skipped(SkipReason),
}

impl Outcome {
    /// Check if the mutation changed the state.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// The ledger owns the players and their buy-ins.
///
/// Every mutation either applies completely or leaves the state untouched.
/// Players and buy-ins are addressed by position; positions shift after a
/// delete, so callers re-resolve indices after every mutation.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    state: LedgerState,
    /// Bumped on every applied mutation.
    revision: u64,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously persisted or retrieved state.
    pub fn from_state(state: LedgerState) -> Self {
        Self { state, revision: 0 }
    }

    /// Current state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Number of applied mutations since this instance was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Players in insertion order.
    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    /// Initial buy-in amount.
    pub fn initial_buy_in(&self) -> Decimal {
        self.state.initial_buy_in
    }

    /// Whether the global initial buy-in has been applied.
    pub fn global_buy_in_applied(&self) -> bool {
        self.state.global_buy_in_applied
    }

    /// Append a player with no buy-ins. Blank names are skipped; duplicate
    /// names are allowed.
    pub fn add_player(&mut self, name: &str) -> Outcome {
        let name = name.trim();
        if name.is_empty() {
            return skipped("add_player", SkipReason::BlankName);
        }

        self.state.players.push(Player::new(name));
        debug!(player = %name, players = self.state.players.len(), "Player added");
        self.applied()
    }

    /// Change the pending initial buy-in. Frozen once applied.
    pub fn set_initial_buy_in(&mut self, amount: Decimal) -> Outcome {
        if self.state.global_buy_in_applied {
            return skipped("set_initial_buy_in", SkipReason::GlobalBuyInApplied);
        }
        if amount < Decimal::ZERO {
            return skipped("set_initial_buy_in", SkipReason::NegativeInitialBuyIn);
        }
        if !within_limits(amount) {
            return skipped("set_initial_buy_in", SkipReason::AmountOutOfRange);
        }

        self.state.initial_buy_in = amount;
        self.applied()
    }

    /// Give every current player one `Cash` buy-in of `amount` and freeze
    /// the initial buy-in. Players added later do not receive it.
    pub fn apply_global_buy_in(&mut self, amount: Decimal) -> Outcome {
        if !is_positive(amount) {
            return skipped("apply_global_buy_in", SkipReason::NonPositiveAmount);
        }
        if !is_recordable(amount) {
            return skipped("apply_global_buy_in", SkipReason::AmountOutOfRange);
        }
        if self.state.global_buy_in_applied {
            return skipped("apply_global_buy_in", SkipReason::GlobalBuyInApplied);
        }

        for player in &mut self.state.players {
            player.buy_ins.push(BuyIn::new(amount, DEFAULT_METHOD));
        }
        self.state.initial_buy_in = amount;
        self.state.global_buy_in_applied = true;

        debug!(
            amount = %amount,
            players = self.state.players.len(),
            "Global initial buy-in applied"
        );
        self.applied()
    }

    /// Append a buy-in to a player.
    pub fn add_buy_in(&mut self, player: usize, amount: Decimal, method: &str) -> Result<Outcome> {
        self.check_player(player)?;
        if let Some(reason) = invalid_entry(amount, method) {
            return Ok(skipped("add_buy_in", reason));
        }

        self.state.players[player]
            .buy_ins
            .push(BuyIn::new(amount, method));
        debug!(player, amount = %amount, method, "Buy-in added");
        Ok(self.applied())
    }

    /// Record another initial buy-in for a player. Only available once the
    /// global initial buy-in has been applied.
    pub fn quick_add(&mut self, player: usize, method: &str) -> Result<Outcome> {
        self.check_player(player)?;
        if !self.state.global_buy_in_applied {
            return Ok(skipped("quick_add", SkipReason::GlobalBuyInNotApplied));
        }

        let amount = self.state.initial_buy_in;
        self.add_buy_in(player, amount, method)
    }

    /// Replace a buy-in in place. A non-positive amount cancels the edit.
    pub fn edit_buy_in(
        &mut self,
        player: usize,
        index: usize,
        amount: Decimal,
        method: &str,
    ) -> Result<Outcome> {
        self.check_buy_in(player, index)?;
        if let Some(reason) = invalid_entry(amount, method) {
            return Ok(skipped("edit_buy_in", reason));
        }

        self.state.players[player].buy_ins[index] = BuyIn::new(amount, method);
        debug!(player, index, amount = %amount, method, "Buy-in edited");
        Ok(self.applied())
    }

    /// Remove a buy-in; later entries shift down one position.
    pub fn delete_buy_in(&mut self, player: usize, index: usize) -> Result<BuyIn> {
        self.check_buy_in(player, index)?;

        let removed = self.state.players[player].buy_ins.remove(index);
        debug!(player, index, amount = %removed.amount, "Buy-in deleted");
        self.revision += 1;
        Ok(removed)
    }

    /// Sum of buy-ins per method, in first-seen order.
    pub fn totals_by_method(&self) -> MethodTotals {
        let mut totals = MethodTotals::new();
        for buy_in in self.state.players.iter().flat_map(|p| &p.buy_ins) {
            totals.add(&buy_in.method, buy_in.amount);
        }
        totals
    }

    /// Sum of every buy-in.
    pub fn total_in_play(&self) -> Decimal {
        self.totals_by_method().total()
    }

    /// Sum of one player's buy-ins.
    pub fn player_total(&self, player: usize) -> Result<Decimal> {
        self.check_player(player)?;
        Ok(self.state.players[player].total())
    }

    /// Suggested big blind using the default denominations.
    pub fn suggested_big_blind(&self) -> Decimal {
        self.suggested_big_blind_with(&DenominationSet::default())
    }

    /// Suggested big blind: one hundredth of the money in play, rounded to
    /// an allowed denomination. Zero when nothing is in play.
    pub fn suggested_big_blind_with(&self, denominations: &DenominationSet) -> Decimal {
        let total = self.total_in_play();
        if total.is_zero() {
            return Decimal::ZERO;
        }
        denominations.round(total / Decimal::ONE_HUNDRED)
    }

    /// Everything the totals overview shows.
    pub fn summary(&self, denominations: &DenominationSet) -> LedgerSummary {
        let by_method = self.totals_by_method();
        LedgerSummary {
            total_in_play: by_method.total(),
            player_totals: self
                .state
                .players
                .iter()
                .map(|p| (p.name.clone(), p.total()))
                .collect(),
            suggested_big_blind: self.suggested_big_blind_with(denominations),
            by_method,
        }
    }

    fn applied(&mut self) -> Outcome {
        self.revision += 1;
        Outcome::Applied
    }

    fn check_player(&self, player: usize) -> Result<()> {
        let count = self.state.players.len();
        if player >= count {
            return Err(TrackerError::PlayerNotFound {
                index: player,
                count,
            });
        }
        Ok(())
    }

    fn check_buy_in(&self, player: usize, index: usize) -> Result<()> {
        self.check_player(player)?;
        let count = self.state.players[player].buy_ins.len();
        if index >= count {
            return Err(TrackerError::BuyInNotFound {
                player,
                index,
                count,
            });
        }
        Ok(())
    }
}

fn invalid_entry(amount: Decimal, method: &str) -> Option<SkipReason> {
    if !is_positive(amount) {
        Some(SkipReason::NonPositiveAmount)
    } else if !is_recordable(amount) {
        Some(SkipReason::AmountOutOfRange)
    } else if method.trim().is_empty() {
        Some(SkipReason::BlankMethod)
    } else {
        None
    }
}

fn skipped(operation: &'static str, reason: SkipReason) -> Outcome {
    debug!(operation, reason = ?reason, "Mutation skipped");
    Outcome::Skipped(reason)
}
