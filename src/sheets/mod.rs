//! Row store integrations.
//!
//! Defines the `RowStore` trait and provides implementations for:
//! - Google Sheets (values API) — the live spreadsheet the tracker was
//!   built around
//! - a local JSON file — offline use and deterministic tests
//!
//! The tracker only ever reads one atomic snapshot per refresh and
//! performs no writes during a ledger run; appends and result patches
//! are separate operations that happen between runs.

pub mod file;
pub mod google;

use anyhow::Result;
use async_trait::async_trait;

/// One raw sheet row: a text cell per column, exactly as fetched.
pub type RawRow = Vec<String>;

/// The two ranges the tracker reads, fetched together.
#[derive(Debug, Clone, Default)]
pub struct SheetSnapshot {
    pub bets: Vec<RawRow>,
    pub competitions: Vec<RawRow>,
}

/// Abstraction over the spreadsheet backing the tracker.
///
/// Row indices are 0-based offsets into the fetched ranges (the ranges
/// start below the header row, so index 0 is the first data row).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch all bet rows, in sheet order.
    async fn fetch_bet_rows(&self) -> Result<Vec<RawRow>>;

    /// Fetch all competition rows.
    async fn fetch_competition_rows(&self) -> Result<Vec<RawRow>>;

    /// Append a new bet row.
    async fn append_bet_row(&self, row: RawRow) -> Result<()>;

    /// Patch the result cell (column F) of one bet row in place —
    /// how a pending bet gets resolved.
    async fn update_result(&self, index: usize, result_text: &str) -> Result<()>;

    /// Append a new competition row.
    async fn append_competition_row(&self, row: RawRow) -> Result<()>;

    /// Patch the status cell of one competition row (e.g. "Closed").
    async fn update_competition_status(&self, index: usize, status_text: &str) -> Result<()>;

    /// Store name for logging and error messages.
    fn name(&self) -> &str;
}

/// Fetch bets and competitions concurrently as one snapshot.
pub async fn load_snapshot(store: &dyn RowStore) -> Result<SheetSnapshot> {
    let (bets, competitions) = futures::future::try_join(
        store.fetch_bet_rows(),
        store.fetch_competition_rows(),
    )
    .await?;

    Ok(SheetSnapshot { bets, competitions })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
