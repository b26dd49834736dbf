//! Shared types for the PUNTER tracker.
//!
//! These types form the data model used across all modules: the parsed
//! bet rows, the competition registry entries, and the computed outputs
//! of the ledger fold. They are designed to be stable so that ingest,
//! ledger, report, and dashboard modules can depend on them without
//! circular references.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Result classification
// ---------------------------------------------------------------------------

/// Classification of the free-text result cell of a bet row.
///
/// The strategy bets the draw (the "X" in 1X2 markets), so the sheet
/// records outcomes as "Draw (X)" / "No Draw" rather than home/away.
/// Classification happens once, at the ingestion boundary; downstream
/// code only ever sees this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetOutcome {
    /// The draw landed — the bet won.
    Win,
    /// The match did not end in a draw — the bet lost.
    Loss,
    /// Not yet resolved (empty cell or an explicit "Pending").
    Pending,
    /// Text we could not classify. Treated as unresolved by the ledger,
    /// but kept distinct so callers can surface bad sheet data.
    Unrecognized,
}

impl BetOutcome {
    /// Classify a raw result cell.
    ///
    /// Policy (case-insensitive): "no draw" → Loss, any other "draw"
    /// (including "Draw (X)") → Win, empty or "pending" → Pending,
    /// anything else → Unrecognized. "no draw" is checked before "draw"
    /// because the former contains the latter.
    pub fn classify(text: &str) -> Self {
        let t = text.trim().to_lowercase();
        if t.is_empty() || t == "pending" {
            BetOutcome::Pending
        } else if t.contains("no draw") {
            BetOutcome::Loss
        } else if t.contains("draw") {
            BetOutcome::Win
        } else {
            BetOutcome::Unrecognized
        }
    }

    /// Whether this outcome settles the bet (closes or extends a cycle).
    pub fn is_resolved(&self) -> bool {
        matches!(self, BetOutcome::Win | BetOutcome::Loss)
    }
}

impl fmt::Display for BetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetOutcome::Win => write!(f, "Win"),
            BetOutcome::Loss => write!(f, "Loss"),
            BetOutcome::Pending => write!(f, "Pending"),
            BetOutcome::Unrecognized => write!(f, "Unrecognized"),
        }
    }
}

/// Status emitted on a computed row (what the dashboard shows).
///
/// Unlike [`BetOutcome`] this has no `Unrecognized` variant: the ledger
/// reports anything unresolved as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettledStatus {
    Won,
    Lost,
    Pending,
}

impl fmt::Display for SettledStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettledStatus::Won => write!(f, "Won"),
            SettledStatus::Lost => write!(f, "Lost"),
            SettledStatus::Pending => write!(f, "Pending"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bet rows
// ---------------------------------------------------------------------------

/// One parsed row of wagering activity.
///
/// Produced by the ingest layer from a raw text row; immutable input to
/// the ledger fold. `stake: None` means the cell was empty, zero, or
/// unparseable — the ledger substitutes the competition's currently
/// tracked next stake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetRecord {
    /// Descriptive only; never used in computation.
    pub date: String,
    /// Key into the competition registry. Rows with an unknown
    /// competition are silently dropped by the ledger.
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    /// Decimal odds, already coerced to 1.0 if the cell was invalid.
    pub odds: Decimal,
    pub stake: Option<Decimal>,
    pub result: BetOutcome,
}

impl fmt::Display for BetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} vs {} @ {} ({})",
            self.competition, self.home_team, self.away_team, self.odds, self.result,
        )
    }
}

impl BetRecord {
    /// Helper to build a test record with sensible defaults.
    #[cfg(test)]
    pub fn sample(competition: &str, result: BetOutcome) -> Self {
        use rust_decimal_macros::dec;
        BetRecord {
            date: "2026-03-01".to_string(),
            competition: competition.to_string(),
            home_team: "Maccabi".to_string(),
            away_team: "Hapoel".to_string(),
            odds: dec!(3.0),
            stake: None,
            result,
        }
    }
}

/// A computed result row: the original descriptive fields plus the
/// resolved stake and the ledger's verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowResult {
    pub date: String,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    pub odds: Decimal,
    /// The stake actually charged (explicit or substituted).
    pub stake: Decimal,
    /// `stake × odds` on a win, zero otherwise.
    pub income: Decimal,
    /// Net profit of the cycle this row closed; zero for losses and
    /// pending rows.
    pub profit: Decimal,
    pub status: SettledStatus,
}

impl fmt::Display for RowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} vs {} | stake={} odds={} | {} (profit {})",
            self.competition,
            self.home_team,
            self.away_team,
            self.stake,
            self.odds,
            self.status,
            self.profit,
        )
    }
}

// ---------------------------------------------------------------------------
// Competitions
// ---------------------------------------------------------------------------

/// Lifecycle status of a competition (betting pool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionStatus {
    Active,
    Closed,
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetitionStatus::Active => write!(f, "Active"),
            CompetitionStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl std::str::FromStr for CompetitionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "open" => Ok(CompetitionStatus::Active),
            "closed" | "inactive" => Ok(CompetitionStatus::Closed),
            _ => Err(anyhow::anyhow!("Unknown competition status: {s}")),
        }
    }
}

/// A named, independent betting pool with its own cycle and default stake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    /// Unique key; bet rows reference competitions by this name.
    pub name: String,
    /// Stake used to open a fresh cycle (and after every win).
    pub default_stake: Decimal,
    pub status: CompetitionStatus,
    /// Display metadata — not used by the ledger.
    pub color: Option<String>,
    pub logo_url: Option<String>,
}

impl Competition {
    pub fn new(name: &str, default_stake: Decimal) -> Self {
        Competition {
            name: name.to_string(),
            default_stake,
            status: CompetitionStatus::Active,
            color: None,
            logo_url: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CompetitionStatus::Active
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (default stake {}, {})",
            self.name, self.default_stake, self.status,
        )
    }
}

// ---------------------------------------------------------------------------
// Accumulated statistics
// ---------------------------------------------------------------------------

/// Per-competition totals accumulated over the full ledger scan.
///
/// Money totals only move on resolved rows; pending rows bump
/// `pending_rows` and nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetitionStats {
    pub total_staked: Decimal,
    pub total_income: Decimal,
    pub net_profit: Decimal,
    pub resolved_rows: u64,
    pub pending_rows: u64,
}

impl CompetitionStats {
    /// Net profit over total stake as a percentage. Zero when nothing
    /// was staked.
    pub fn yield_pct(&self) -> Decimal {
        if self.total_staked.is_zero() {
            Decimal::ZERO
        } else {
            self.net_profit / self.total_staked * Decimal::ONE_HUNDRED
        }
    }
}

impl fmt::Display for CompetitionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "staked={} income={} profit={} ({} resolved, {} pending)",
            self.total_staked,
            self.total_income,
            self.net_profit,
            self.resolved_rows,
            self.pending_rows,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for PUNTER.
///
/// The ledger fold itself never fails — malformed cells degrade to safe
/// defaults at ingest. These cover the fallible outer layers: sheet
/// access, configuration, and registry mutation.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Sheet error ({store}): {message}")]
    Sheet { store: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Competition already exists: {0}")]
    CompetitionExists(String),

    #[error("Unknown competition: {0}")]
    UnknownCompetition(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
