//! Subcommands of the command-line client.

use anyhow::{bail, Context};
use clap::builder::PossibleValuesParser;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use buyin_common::{format_money, resolve_method, SnapshotId, DEFAULT_METHOD, PAYMENT_METHODS};
use buyin_ledger::{DenominationSet, Ledger, Outcome, ReadOnlyView, StateStore, TrackedLedger};

use crate::client::SnapshotClient;

/// Payment method selection.
#[derive(Args, Debug, Clone)]
pub struct MethodArgs {
    /// Payment method
    #[arg(
        short,
        long,
        default_value = DEFAULT_METHOD,
        value_parser = PossibleValuesParser::new(PAYMENT_METHODS)
    )]
    pub method: String,

    /// Free-text label recorded when the method is Custom
    #[arg(long)]
    pub custom: Option<String>,
}

impl MethodArgs {
    /// The label recorded on the buy-in.
    pub fn resolve(&self) -> String {
        resolve_method(&self.method, self.custom.as_deref())
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a player with no buy-ins
    AddPlayer {
        /// Player name
        name: String,
    },

    /// Set the initial buy-in before it is applied
    SetInitial {
        /// Amount
        amount: Decimal,
    },

    /// Give every current player the initial buy-in (Cash)
    ApplyInitial {
        /// Amount; defaults to the configured initial buy-in
        amount: Option<Decimal>,
    },

    /// Record a buy-in for a player
    BuyIn {
        /// Player number, as listed by `show`
        player: usize,
        /// Amount
        amount: Decimal,
        #[command(flatten)]
        method: MethodArgs,
    },

    /// Record another initial buy-in for a player
    QuickAdd {
        /// Player number, as listed by `show`
        player: usize,
        #[command(flatten)]
        method: MethodArgs,
    },

    /// Replace a buy-in
    Edit {
        /// Player number, as listed by `show`
        player: usize,
        /// Buy-in number within the player's list
        entry: usize,
        /// New amount
        amount: Decimal,
        #[command(flatten)]
        method: MethodArgs,
    },

    /// Remove a buy-in
    Delete {
        /// Player number, as listed by `show`
        player: usize,
        /// Buy-in number within the player's list
        entry: usize,
    },

    /// Show totals and every player's buy-ins
    Show,

    /// Publish the ledger and print a read-only share link
    Share,

    /// Print a published ledger
    View {
        /// Snapshot identifier from a share link
        id: String,
    },
}

/// Convert a 1-based number from the command line into a position.
fn position(number: usize, what: &str) -> anyhow::Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("{} numbers start at 1", what),
    }
}

fn describe(outcome: Outcome, done: String) -> String {
    match outcome {
        Outcome::Applied => done,
        Outcome::Skipped(reason) => format!("Nothing changed: {}", reason),
    }
}

/// Render the totals overview followed by numbered buy-in lists.
pub fn render_ledger(ledger: &Ledger, denominations: &DenominationSet) -> String {
    let mut out = ledger.summary(denominations).to_text();

    if ledger.global_buy_in_applied() {
        out.push_str(&format!(
            "Initial buy-in: {} (applied)\n",
            format_money(ledger.initial_buy_in())
        ));
    } else {
        out.push_str(&format!(
            "Initial buy-in: {} (not applied)\n",
            format_money(ledger.initial_buy_in())
        ));
    }

    if ledger.players().is_empty() {
        out.push_str("\nNo players added.\n");
        return out;
    }

    for (p, player) in ledger.players().iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} (Total: {})\n",
            p + 1,
            player.name,
            format_money(player.total())
        ));
        for (i, buy_in) in player.buy_ins.iter().enumerate() {
            out.push_str(&format!("   {}) {}\n", i + 1, buy_in.label()));
        }
    }
    out
}

/// Run a command that only touches the local ledger. Returns the text to
/// print, or `None` for commands that need the server.
pub fn run_local<S: StateStore>(
    command: &Command,
    tracked: &mut TrackedLedger<S>,
    denominations: &DenominationSet,
) -> anyhow::Result<Option<String>> {
    let message = match command {
        Command::AddPlayer { name } => {
            let outcome = tracked.mutate(|l| l.add_player(name))?;
            describe(outcome, format!("Added player {}", name.trim()))
        }
        Command::SetInitial { amount } => {
            let outcome = tracked.mutate(|l| l.set_initial_buy_in(*amount))?;
            describe(outcome, format!("Initial buy-in set to {}", format_money(*amount)))
        }
        Command::ApplyInitial { amount } => {
            let amount = amount.unwrap_or_else(|| tracked.ledger().initial_buy_in());
            let outcome = tracked.mutate(|l| l.apply_global_buy_in(amount))?;
            describe(
                outcome,
                format!(
                    "Applied {} initial buy-in to {} players",
                    format_money(amount),
                    tracked.ledger().players().len()
                ),
            )
        }
        Command::BuyIn {
            player,
            amount,
            method,
        } => {
            let index = position(*player, "Player")?;
            let label = method.resolve();
            let outcome = tracked.mutate(|l| l.add_buy_in(index, *amount, &label))??;
            describe(outcome, format!("Recorded {} - {}", format_money(*amount), label))
        }
        Command::QuickAdd { player, method } => {
            let index = position(*player, "Player")?;
            let label = method.resolve();
            let outcome = tracked.mutate(|l| l.quick_add(index, &label))??;
            describe(
                outcome,
                format!(
                    "Recorded {} - {}",
                    format_money(tracked.ledger().initial_buy_in()),
                    label
                ),
            )
        }
        Command::Edit {
            player,
            entry,
            amount,
            method,
        } => {
            let p = position(*player, "Player")?;
            let i = position(*entry, "Buy-in")?;
            let label = method.resolve();
            let outcome = tracked.mutate(|l| l.edit_buy_in(p, i, *amount, &label))??;
            describe(outcome, format!("Updated buy-in {} of player {}", entry, player))
        }
        Command::Delete { player, entry } => {
            let p = position(*player, "Player")?;
            let i = position(*entry, "Buy-in")?;
            let removed = tracked.mutate(|l| l.delete_buy_in(p, i))??;
            format!("Deleted {}", removed.label())
        }
        Command::Show => render_ledger(tracked.ledger(), denominations),
        Command::Share | Command::View { .. } => return Ok(None),
    };
    Ok(Some(message))
}

/// Publish the local ledger and return the share link.
pub async fn share(client: &SnapshotClient, ledger: &Ledger) -> anyhow::Result<String> {
    let id = client
        .publish(ledger.state())
        .await
        .context("Failed to generate share link")?;
    Ok(client.share_link(&id))
}

/// Fetch a published ledger and render it read-only.
pub async fn view(client: &SnapshotClient, id: &str) -> anyhow::Result<String> {
    let id = SnapshotId::new(id.trim());
    if !id.is_valid() {
        bail!("Invalid snapshot identifier: {:?}", id.as_str());
    }

    match client.retrieve(&id).await.context("Failed to load data")? {
        Some(state) => Ok(ReadOnlyView::from_state(&state).to_text()),
        None => bail!("Data not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buyin_common::TrackerError;
    use buyin_ledger::MemoryStateStore;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["buyin"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().command
    }

    fn run(tracked: &mut TrackedLedger<MemoryStateStore>, args: &[&str]) -> String {
        run_local(&parse(args), tracked, &DenominationSet::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_parse_buy_in_with_custom_method() {
        match parse(&["buy-in", "2", "20.50", "--method", "Custom", "--custom", "IOU"]) {
            Command::BuyIn {
                player,
                amount,
                method,
            } => {
                assert_eq!(player, 2);
                assert_eq!(amount, dec!(20.50));
                assert_eq!(method.resolve(), "IOU");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_method_defaults_to_cash() {
        match parse(&["quick-add", "1"]) {
            Command::QuickAdd { method, .. } => assert_eq!(method.resolve(), "Cash"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        assert!(TestCli::try_parse_from(["buyin", "buy-in", "1", "20", "--method", "Bitcoin"]).is_err());
        match parse(&["buy-in", "1", "20", "--method", "Apple Pay"]) {
            Command::BuyIn { method, .. } => assert_eq!(method.resolve(), "Apple Pay"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_oversized_buy_in_is_skipped_and_show_still_works() {
        let mut tracked = TrackedLedger::open(MemoryStateStore::new());
        run(&mut tracked, &["add-player", "Alice"]);

        let message = run(&mut tracked, &["buy-in", "1", "50000000000000000000000000000"]);
        assert_eq!(
            message,
            "Nothing changed: amount is too large or has too many decimal places"
        );
        run(&mut tracked, &["buy-in", "1", "50000000000000000000000000000"]);

        let text = run(&mut tracked, &["show"]);
        assert!(text.contains("Total in play: $0.00"));
        assert_eq!(tracked.store().save_count(), 1);
    }

    #[test]
    fn test_positions_are_one_based() {
        assert_eq!(position(1, "Player").unwrap(), 0);
        assert_eq!(position(3, "Player").unwrap(), 2);
        assert!(position(0, "Player").is_err());
    }

    #[test]
    fn test_session_is_saved_after_each_change() {
        let mut tracked = TrackedLedger::open(MemoryStateStore::new());

        run(&mut tracked, &["add-player", "Alice"]);
        run(&mut tracked, &["add-player", "Bob"]);
        let message = run(&mut tracked, &["apply-initial", "50"]);
        assert_eq!(message, "Applied $50.00 initial buy-in to 2 players");
        run(&mut tracked, &["quick-add", "1", "--method", "Venmo"]);
        run(&mut tracked, &["buy-in", "2", "20", "--method", "Zelle"]);

        assert_eq!(tracked.ledger().total_in_play(), dec!(170));
        assert_eq!(tracked.store().save_count(), 5);

        let reopened = TrackedLedger::open(MemoryStateStore::with_payload(
            tracked.store().payload().unwrap(),
        ));
        assert_eq!(reopened.ledger().state(), tracked.ledger().state());
    }

    #[test]
    fn test_skipped_change_is_reported_and_not_saved() {
        let mut tracked = TrackedLedger::open(MemoryStateStore::new());
        run(&mut tracked, &["add-player", "Alice"]);

        let message = run(&mut tracked, &["quick-add", "1"]);
        assert_eq!(
            message,
            "Nothing changed: initial buy-in has not been applied yet"
        );
        assert_eq!(tracked.store().save_count(), 1);
    }

    #[test]
    fn test_unknown_player_is_an_error() {
        let mut tracked = TrackedLedger::open(MemoryStateStore::new());

        let err = run_local(
            &parse(&["buy-in", "1", "20"]),
            &mut tracked,
            &DenominationSet::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::PlayerNotFound { index: 0, count: 0 })
        ));
        assert_eq!(tracked.store().save_count(), 0);
    }

    #[test]
    fn test_edit_and_delete() {
        let mut tracked = TrackedLedger::open(MemoryStateStore::new());
        run(&mut tracked, &["add-player", "Alice"]);
        run(&mut tracked, &["buy-in", "1", "20"]);
        run(&mut tracked, &["buy-in", "1", "30", "--method", "Venmo"]);

        run(&mut tracked, &["edit", "1", "1", "25", "--method", "Zelle"]);
        let message = run(&mut tracked, &["delete", "1", "2"]);

        assert_eq!(message, "Deleted $30 - Venmo");
        let buy_ins = &tracked.ledger().players()[0].buy_ins;
        assert_eq!(buy_ins.len(), 1);
        assert_eq!(buy_ins[0].amount, dec!(25));
        assert_eq!(buy_ins[0].method, "Zelle");
    }

    #[test]
    fn test_show_lists_totals_and_entries() {
        let mut tracked = TrackedLedger::open(MemoryStateStore::new());
        run(&mut tracked, &["add-player", "Alice"]);
        run(&mut tracked, &["add-player", "Bob"]);
        run(&mut tracked, &["apply-initial", "100"]);
        run(&mut tracked, &["buy-in", "2", "50", "--method", "Venmo"]);

        let text = run(&mut tracked, &["show"]);

        assert!(text.contains("Total in play: $250.00"));
        assert!(text.contains("  Venmo: $50.00"));
        assert!(text.contains("Optimal BB (Total): 3"));
        assert!(text.contains("Initial buy-in: $100.00 (applied)"));
        assert!(text.contains("2. Bob (Total: $150.00)"));
        assert!(text.contains("   2) $50 - Venmo"));
    }

    #[test]
    fn test_network_commands_are_not_local() {
        let mut tracked = TrackedLedger::open(MemoryStateStore::new());
        let result = run_local(&Command::Share, &mut tracked, &DenominationSet::default()).unwrap();
        assert!(result.is_none());
    }
}
