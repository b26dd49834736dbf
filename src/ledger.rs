//! Bet ledger — the single-pass fold over the full betting history.
//!
//! Replays every bet row in sheet order and derives, per competition,
//! the open cycle state (cumulative stake at risk since the last win,
//! next recommended stake under the loss-doubling policy), per-row
//! results, accumulated statistics, and the total pending exposure.
//!
//! The fold is pure: no I/O, no ambient state, recomputed from scratch
//! on every refresh. That trades O(n) per refresh for the elimination of
//! state-drift bugs — there is nothing to migrate or repair, the sheet
//! is the only source of truth.
//!
//! Doubling after a loss is unconditional: `next_stake = 2 × stake`
//! whatever the recorded odds were. With odds away from 2.0 a win does
//! not exactly recover the cycle, so this is a policy, not a recovery
//! guarantee.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::registry::CompetitionRegistry;
use crate::types::{BetOutcome, BetRecord, CompetitionStats, RowResult, SettledStatus};

// ---------------------------------------------------------------------------
// Cycle state
// ---------------------------------------------------------------------------

/// Running state for one competition during the scan. At most one open
/// cycle per competition at any point.
#[derive(Debug, Clone)]
struct CycleState {
    /// Sum of stakes wagered since the last win (or since the start).
    cumulative_investment: Decimal,
    /// Stake to use for the next bet in this competition.
    next_stake: Decimal,
    /// Stakes of rows still unresolved — exposure, not cycle money.
    pending_stakes: Decimal,
}

impl CycleState {
    fn new(default_stake: Decimal) -> Self {
        Self {
            cumulative_investment: Decimal::ZERO,
            next_stake: default_stake,
            pending_stakes: Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Everything the fold produces for one run.
#[derive(Debug, Clone)]
pub struct LedgerOutput {
    /// Per-row computed results, in input order. Rows whose competition
    /// was unknown are absent.
    pub rows: Vec<RowResult>,
    /// Recommended stake for the next bet, per competition. Contains an
    /// entry for every registered competition, including ones with no
    /// rows (their default stake).
    pub next_stakes: HashMap<String, Decimal>,
    /// Accumulated statistics per competition.
    pub stats: HashMap<String, CompetitionStats>,
    /// Money at risk in bets not yet settled: open-cycle cumulative
    /// investment plus the stakes of pending rows.
    pub pending_losses: Decimal,
    /// Rows dropped because their competition was not registered. Never
    /// counted in any total; surfaced so "no activity" and "all rows
    /// unreadable" can be told apart.
    pub dropped_rows: u64,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

pub struct Ledger;

impl Ledger {
    /// Replay `records` in order against the registered competitions.
    ///
    /// Per record:
    /// 1. Unknown competition → dropped.
    /// 2. Stake = the row's stake, or the competition's current next
    ///    stake when the cell was empty/zero/unparseable.
    /// 3. Pending (or unrecognized) → row emitted with zero profit, no
    ///    cycle mutation; stake accrues to pending exposure.
    /// 4. Win → stake joins the cycle, income = stake × odds, profit =
    ///    income − cumulative investment; cycle closes (investment back
    ///    to zero, next stake back to the default).
    /// 5. Loss → stake joins the cycle, zero income and zero emitted
    ///    profit (the loss is absorbed into the open cycle), next stake
    ///    doubles.
    pub fn process(records: &[BetRecord], registry: &CompetitionRegistry) -> LedgerOutput {
        let mut cycles: HashMap<String, CycleState> = HashMap::new();
        let mut stats: HashMap<String, CompetitionStats> = HashMap::new();
        for comp in registry.all() {
            cycles.insert(comp.name.clone(), CycleState::new(comp.default_stake));
            stats.insert(comp.name.clone(), CompetitionStats::default());
        }

        let mut rows: Vec<RowResult> = Vec::with_capacity(records.len());
        let mut dropped_rows: u64 = 0;

        for record in records {
            let Some(comp) = registry.get(&record.competition) else {
                debug!(competition = %record.competition, "Dropping row for unknown competition");
                dropped_rows += 1;
                continue;
            };

            let cycle = cycles
                .entry(comp.name.clone())
                .or_insert_with(|| CycleState::new(comp.default_stake));
            let comp_stats = stats.entry(comp.name.clone()).or_default();

            let stake = record.stake.unwrap_or(cycle.next_stake);

            let (status, income, profit) = match record.result {
                BetOutcome::Pending | BetOutcome::Unrecognized => {
                    // Unresolved rows reserve no cycle state change;
                    // their stake is exposure, nothing else.
                    cycle.pending_stakes += stake;
                    comp_stats.pending_rows += 1;
                    (SettledStatus::Pending, Decimal::ZERO, Decimal::ZERO)
                }
                BetOutcome::Win => {
                    cycle.cumulative_investment += stake;
                    comp_stats.total_staked += stake;
                    comp_stats.resolved_rows += 1;

                    let income = stake * record.odds;
                    let profit = income - cycle.cumulative_investment;
                    comp_stats.total_income += income;
                    comp_stats.net_profit += profit;

                    // Cycle closes.
                    cycle.cumulative_investment = Decimal::ZERO;
                    cycle.next_stake = comp.default_stake;

                    (SettledStatus::Won, income, profit)
                }
                BetOutcome::Loss => {
                    cycle.cumulative_investment += stake;
                    comp_stats.total_staked += stake;
                    comp_stats.resolved_rows += 1;

                    // Martingale: the loss is charged when the cycle
                    // closes (or shows up as pending exposure while it
                    // stays open), so the emitted profit is zero here.
                    cycle.next_stake = stake * dec!(2);

                    (SettledStatus::Lost, Decimal::ZERO, Decimal::ZERO)
                }
            };

            rows.push(RowResult {
                date: record.date.clone(),
                competition: record.competition.clone(),
                home_team: record.home_team.clone(),
                away_team: record.away_team.clone(),
                odds: record.odds,
                stake,
                income,
                profit,
                status,
            });
        }

        let pending_losses: Decimal = cycles
            .values()
            .map(|c| c.cumulative_investment + c.pending_stakes)
            .sum();

        let next_stakes: HashMap<String, Decimal> = cycles
            .into_iter()
            .map(|(name, cycle)| (name, cycle.next_stake))
            .collect();

        info!(
            rows = rows.len(),
            dropped = dropped_rows,
            competitions = registry.len(),
            pending_losses = %pending_losses,
            "Ledger recomputed"
        );

        LedgerOutput {
            rows,
            next_stakes,
            stats,
            pending_losses,
            dropped_rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
