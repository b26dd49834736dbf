//! Reporting — reduction of a ledger run into display totals.
//!
//! Pure read-only aggregation over [`LedgerOutput`]; no additional
//! policy lives here. The dashboard serializes these structs as-is.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::ledger::LedgerOutput;
use crate::registry::CompetitionRegistry;
use crate::types::{CompetitionStats, CompetitionStatus};

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// One competition's totals for display.
#[derive(Debug, Clone, Serialize)]
pub struct CompetitionSummary {
    pub name: String,
    pub status: CompetitionStatus,
    pub total_staked: Decimal,
    pub total_income: Decimal,
    pub net_profit: Decimal,
    pub yield_pct: Decimal,
    /// Recommended stake for the next bet in this pool.
    pub next_stake: Decimal,
    pub resolved_rows: u64,
    pub pending_rows: u64,
}

/// Grand totals across all competitions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GrandTotals {
    pub total_staked: Decimal,
    pub total_income: Decimal,
    pub net_profit: Decimal,
    /// Money at risk in bets not yet settled.
    pub pending_losses: Decimal,
    pub resolved_rows: u64,
    pub pending_rows: u64,
    pub dropped_rows: u64,
}

/// Full tracker summary for one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub competitions: Vec<CompetitionSummary>,
    pub totals: GrandTotals,
    pub initial_bankroll: Decimal,
    /// `initial_bankroll + net profit − pending exposure`.
    pub current_balance: Decimal,
    pub currency: String,
    pub generated_at: DateTime<Utc>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "balance {}{} | profit {}{} | at risk {}{} | {} pools, {} resolved / {} pending",
            self.currency,
            self.current_balance,
            self.currency,
            self.totals.net_profit,
            self.currency,
            self.totals.pending_losses,
            self.competitions.len(),
            self.totals.resolved_rows,
            self.totals.pending_rows,
        )
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

impl Summary {
    /// Aggregate a ledger run. Competitions come out sorted by name;
    /// ones the registry knows but the ledger never saw rows for appear
    /// with zeroed totals and their default next stake.
    pub fn build(
        output: &LedgerOutput,
        registry: &CompetitionRegistry,
        initial_bankroll: Decimal,
        currency: &str,
    ) -> Self {
        let empty = CompetitionStats::default();
        let mut competitions: Vec<CompetitionSummary> = Vec::with_capacity(registry.len());
        let mut totals = GrandTotals {
            pending_losses: output.pending_losses,
            dropped_rows: output.dropped_rows,
            ..GrandTotals::default()
        };

        for comp in registry.all() {
            let stats = output.stats.get(&comp.name).unwrap_or(&empty);
            let next_stake = output
                .next_stakes
                .get(&comp.name)
                .copied()
                .unwrap_or(comp.default_stake);

            totals.total_staked += stats.total_staked;
            totals.total_income += stats.total_income;
            totals.net_profit += stats.net_profit;
            totals.resolved_rows += stats.resolved_rows;
            totals.pending_rows += stats.pending_rows;

            competitions.push(CompetitionSummary {
                name: comp.name.clone(),
                status: comp.status,
                total_staked: stats.total_staked,
                total_income: stats.total_income,
                net_profit: stats.net_profit,
                yield_pct: stats.yield_pct(),
                next_stake,
                resolved_rows: stats.resolved_rows,
                pending_rows: stats.pending_rows,
            });
        }

        let current_balance = initial_bankroll + totals.net_profit - totals.pending_losses;

        Summary {
            competitions,
            totals,
            initial_bankroll,
            current_balance,
            currency: currency.to_string(),
            generated_at: Utc::now(),
        }
    }

    /// A summary with no activity — the dashboard's state before the
    /// first refresh completes.
    pub fn empty(initial_bankroll: Decimal, currency: &str) -> Self {
        Summary {
            competitions: Vec::new(),
            totals: GrandTotals::default(),
            initial_bankroll,
            current_balance: initial_bankroll,
            currency: currency.to_string(),
            generated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::types::{BetOutcome, BetRecord, Competition};
    use rust_decimal_macros::dec;

    fn run_summary() -> Summary {
        let reg = CompetitionRegistry::from_competitions(vec![
            Competition::new("Serie A", dec!(30)),
            Competition::new("La Liga", dec!(25)),
        ]);

        let mut loss = BetRecord::sample("Serie A", BetOutcome::Loss);
        loss.odds = dec!(3.0);
        let mut win = BetRecord::sample("Serie A", BetOutcome::Win);
        win.odds = dec!(3.0);
        let mut pending = BetRecord::sample("La Liga", BetOutcome::Pending);
        pending.stake = Some(dec!(40));

        let output = Ledger::process(&[loss, win, pending], &reg);
        Summary::build(&output, &reg, dec!(1000), "€")
    }

    #[test]
    fn test_build_per_competition() {
        let summary = run_summary();
        assert_eq!(summary.competitions.len(), 2);

        // Sorted by name: La Liga first.
        let la_liga = &summary.competitions[0];
        assert_eq!(la_liga.name, "La Liga");
        assert_eq!(la_liga.pending_rows, 1);
        assert_eq!(la_liga.next_stake, dec!(25));
        assert!(la_liga.total_staked.is_zero());

        let serie_a = &summary.competitions[1];
        assert_eq!(serie_a.name, "Serie A");
        assert_eq!(serie_a.total_staked, dec!(90)); // 30 + 60
        assert_eq!(serie_a.net_profit, dec!(90)); // 180 − 90
        assert_eq!(serie_a.next_stake, dec!(30)); // cycle closed
        assert_eq!(serie_a.yield_pct, dec!(100));
    }

    #[test]
    fn test_build_grand_totals_and_balance() {
        let summary = run_summary();
        assert_eq!(summary.totals.net_profit, dec!(90));
        assert_eq!(summary.totals.pending_losses, dec!(40));
        assert_eq!(summary.totals.resolved_rows, 2);
        assert_eq!(summary.totals.pending_rows, 1);
        // 1000 + 90 − 40
        assert_eq!(summary.current_balance, dec!(1050));
    }

    #[test]
    fn test_empty_summary_balance_is_bankroll() {
        let summary = Summary::empty(dec!(500), "$");
        assert_eq!(summary.current_balance, dec!(500));
        assert!(summary.competitions.is_empty());
    }

    #[test]
    fn test_summary_display() {
        let summary = run_summary();
        let line = format!("{summary}");
        assert!(line.contains("1050"));
        assert!(line.contains("2 pools"));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = run_summary();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("current_balance"));
        assert!(json.contains("Serie A"));
    }
}
