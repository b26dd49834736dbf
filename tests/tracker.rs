//! End-to-end pipeline tests.
//!
//! Drive the whole path a refresh takes — raw text rows in a store,
//! snapshot fetch, parsing, the ledger fold, summary aggregation —
//! using the file store as a deterministic stand-in for the live
//! spreadsheet.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use punter::ingest;
use punter::ledger::Ledger;
use punter::registry::CompetitionRegistry;
use punter::report::Summary;
use punter::sheets::file::FileStore;
use punter::sheets::{load_snapshot, RawRow, RowStore};

fn temp_path() -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("punter_e2e_{}.json", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

fn row(cells: &[&str]) -> RawRow {
    cells.iter().map(|c| c.to_string()).collect()
}

fn cleanup(path: &str) {
    let _ = std::fs::remove_file(path);
}

async fn seed_store(path: &str, competitions: Vec<RawRow>, bets: Vec<RawRow>) -> FileStore {
    let store = FileStore::open(path).unwrap();
    for comp in competitions {
        store.append_competition_row(comp).await.unwrap();
    }
    for bet in bets {
        store.append_bet_row(bet).await.unwrap();
    }
    store
}

async fn run_fold(store: &FileStore, bankroll: Decimal) -> (Summary, punter::ledger::LedgerOutput) {
    let snapshot = load_snapshot(store).await.unwrap();
    let registry = CompetitionRegistry::from_rows(&snapshot.competitions);
    let records = ingest::parse_bets(&snapshot.bets);
    let output = Ledger::process(&records, &registry);
    let summary = Summary::build(&output, &registry, bankroll, "€");
    (summary, output)
}

#[tokio::test]
async fn loss_then_win_cycle_through_the_full_pipeline() {
    let path = temp_path();
    let store = seed_store(
        &path,
        vec![row(&["Serie A", "30", "Active"])],
        vec![
            // Empty stake cells: the ledger substitutes the tracked stake.
            row(&["2026-03-01", "Serie A", "Roma", "Lazio", "3.0", "No Draw", ""]),
            row(&["2026-03-08", "Serie A", "Milan", "Inter", "3.0", "Draw (X)", ""]),
        ],
    )
    .await;

    let (summary, output) = run_fold(&store, dec!(1000)).await;

    // 30 lost, then 60 at odds 3.0: income 180, cycle profit 90.
    assert_eq!(output.rows[0].stake, dec!(30));
    assert_eq!(output.rows[1].stake, dec!(60));
    assert_eq!(output.rows[1].profit, dec!(90));
    assert_eq!(output.next_stakes["Serie A"], dec!(30));

    assert_eq!(summary.totals.net_profit, dec!(90));
    assert_eq!(summary.totals.pending_losses, Decimal::ZERO);
    assert_eq!(summary.current_balance, dec!(1090));

    cleanup(&path);
}

#[tokio::test]
async fn unknown_competition_rows_vanish_from_output() {
    let path = temp_path();
    let store = seed_store(
        &path,
        vec![row(&["Serie A", "30", "Active"])],
        vec![
            row(&["2026-03-01", "Unknown League", "A", "B", "3.0", "Draw (X)", "50"]),
            row(&["2026-03-01", "Serie A", "Roma", "Lazio", "3.0", "Draw (X)", "30"]),
        ],
    )
    .await;

    let (summary, output) = run_fold(&store, dec!(1000)).await;

    assert_eq!(output.rows.len(), 1);
    assert_eq!(output.dropped_rows, 1);
    // The phantom win contributes to nothing.
    assert_eq!(summary.totals.total_staked, dec!(30));
    assert_eq!(summary.totals.net_profit, dec!(60)); // 90 − 30

    cleanup(&path);
}

#[tokio::test]
async fn garbage_odds_degrade_to_evens() {
    let path = temp_path();
    let store = seed_store(
        &path,
        vec![row(&["Serie A", "30", "Active"])],
        vec![row(&["2026-03-01", "Serie A", "Roma", "Lazio", "abc", "Draw (X)", "30"])],
    )
    .await;

    let (_, output) = run_fold(&store, dec!(1000)).await;

    // odds coerced to 1.0: a win pays back exactly the stake.
    assert_eq!(output.rows[0].odds, dec!(1.0));
    assert_eq!(output.rows[0].income, dec!(30));
    assert_eq!(output.rows[0].profit, Decimal::ZERO);

    cleanup(&path);
}

#[tokio::test]
async fn pending_stake_reduces_balance_but_not_totals() {
    let path = temp_path();
    let store = seed_store(
        &path,
        vec![row(&["Serie A", "30", "Active"])],
        vec![row(&["2026-03-01", "Serie A", "Roma", "Lazio", "3.0", "Pending", "50"])],
    )
    .await;

    let (summary, _) = run_fold(&store, dec!(1000)).await;

    assert_eq!(summary.totals.pending_losses, dec!(50));
    assert_eq!(summary.totals.total_staked, Decimal::ZERO);
    assert_eq!(summary.current_balance, dec!(950));

    cleanup(&path);
}

#[tokio::test]
async fn resolving_a_pending_bet_between_runs_advances_the_cycle() {
    let path = temp_path();
    let store = seed_store(
        &path,
        vec![row(&["Serie A", "30", "Active"])],
        vec![row(&["2026-03-01", "Serie A", "Roma", "Lazio", "3.0", "", ""])],
    )
    .await;

    // First run: the bet is open, its (substituted) stake is exposure.
    let (summary, output) = run_fold(&store, dec!(1000)).await;
    assert_eq!(summary.totals.pending_losses, dec!(30));
    assert_eq!(output.next_stakes["Serie A"], dec!(30));

    // The result comes in as a loss; the UI patches column F in place.
    store.update_result(0, "No Draw").await.unwrap();

    // Next run recomputes from scratch: the loss opens a cycle and
    // doubles the next stake.
    let (summary, output) = run_fold(&store, dec!(1000)).await;
    assert_eq!(summary.totals.pending_losses, dec!(30)); // now open-cycle money
    assert_eq!(summary.totals.total_staked, dec!(30));
    assert_eq!(output.next_stakes["Serie A"], dec!(60));

    cleanup(&path);
}

#[tokio::test]
async fn currency_symbols_and_comma_decimals_flow_through() {
    let path = temp_path();
    let store = seed_store(
        &path,
        vec![row(&["Serie A", "30", "Active"])],
        vec![row(&["2026-03-01", "Serie A", "Roma", "Lazio", "3,2", "Draw (X)", "€45"])],
    )
    .await;

    let (_, output) = run_fold(&store, dec!(1000)).await;

    assert_eq!(output.rows[0].odds, dec!(3.2));
    assert_eq!(output.rows[0].stake, dec!(45));
    assert_eq!(output.rows[0].income, dec!(144));

    cleanup(&path);
}

#[tokio::test]
async fn multiple_pools_settle_independently() {
    let path = temp_path();
    let store = seed_store(
        &path,
        vec![
            row(&["Serie A", "30", "Active"]),
            row(&["La Liga", "25", "Active"]),
        ],
        vec![
            row(&["2026-03-01", "Serie A", "Roma", "Lazio", "3.0", "No Draw", ""]),
            row(&["2026-03-01", "La Liga", "Betis", "Sevilla", "3.0", "Draw (X)", ""]),
            row(&["2026-03-08", "Serie A", "Milan", "Inter", "3.0", "No Draw", ""]),
        ],
    )
    .await;

    let (summary, output) = run_fold(&store, dec!(1000)).await;

    assert_eq!(output.next_stakes["Serie A"], dec!(120)); // 30, 60 lost
    assert_eq!(output.next_stakes["La Liga"], dec!(25)); // cycle closed
    assert_eq!(summary.totals.pending_losses, dec!(90));
    assert_eq!(summary.totals.net_profit, dec!(50)); // 25 × 3 − 25
    // 1000 + 50 − 90
    assert_eq!(summary.current_balance, dec!(960));

    cleanup(&path);
}
