//! Ingestion boundary — turning raw sheet cells into typed records.
//!
//! Every cell arrives as text (the sheet is hand-edited), so all parsing
//! here is tolerant: currency symbols, locale comma decimals, stray
//! whitespace, and short rows all degrade to safe defaults instead of
//! errors. Nothing past this module ever sees a raw string cell.
//!
//! Bet rows use the fixed column order
//! `[Date, Competition, Home Team, Away Team, Odds, Result, Stake]`
//! (A..G; the Result cell in column F is the one the UI patches in place
//! when a pending bet resolves). Ranges are expected to start below the
//! header row, so no header detection is done here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{BetOutcome, BetRecord, Competition, CompetitionStatus};

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

pub const COL_DATE: usize = 0;
pub const COL_COMPETITION: usize = 1;
pub const COL_HOME: usize = 2;
pub const COL_AWAY: usize = 3;
pub const COL_ODDS: usize = 4;
/// Column F — the mutable result cell.
pub const COL_RESULT: usize = 5;
pub const COL_STAKE: usize = 6;

/// Number of columns in a bet row (A..G).
pub const BET_COLUMNS: usize = 7;

/// A1 letter of the result column, used when patching a single result
/// cell in place.
pub const COL_RESULT_LETTER: char = 'F';

/// Competitions sheet: `[Name, Default Stake, Status, Color, Logo]`.
const COL_COMP_NAME: usize = 0;
const COL_COMP_STAKE: usize = 1;
const COL_COMP_STATUS: usize = 2;
const COL_COMP_COLOR: usize = 3;
const COL_COMP_LOGO: usize = 4;

/// A1 letter of the competition status column.
pub const COL_COMP_STATUS_LETTER: char = 'C';

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Fetch a cell by index, treating missing trailing cells as empty.
fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(String::as_str).unwrap_or("").trim()
}

/// Parse a numeric cell into a `Decimal`.
///
/// Accepts currency symbols (€ $ £ ₪), thousands separators, and locale
/// comma decimals ("1,5" == 1.5). Returns None when nothing numeric
/// remains.
fn parse_number(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '£' | '₪') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    // With both separators present the comma is a thousands separator
    // ("1,234.56"); with only a comma it is the decimal point ("1,5").
    let normalized = if cleaned.contains(',') && cleaned.contains('.') {
        cleaned.replace(',', "")
    } else {
        cleaned.replace(',', ".")
    };

    normalized.parse::<Decimal>().ok()
}

/// Parse an odds cell. Non-positive or unparseable odds are coerced to
/// 1.0 — a bad cell must not blow up downstream profit arithmetic.
pub fn parse_odds(raw: &str) -> Decimal {
    match parse_number(raw) {
        Some(odds) if odds > Decimal::ZERO => odds,
        _ => dec!(1.0),
    }
}

/// Parse a stake cell. Empty, zero, or unparseable stakes become None,
/// which tells the ledger to substitute the competition's tracked next
/// stake.
pub fn parse_stake(raw: &str) -> Option<Decimal> {
    parse_number(raw).filter(|s| *s > Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Parse one bet row. Never fails: short rows are padded with empty
/// cells and every malformed field takes its safe default.
pub fn parse_bet_row(cells: &[String]) -> BetRecord {
    BetRecord {
        date: cell(cells, COL_DATE).to_string(),
        competition: cell(cells, COL_COMPETITION).to_string(),
        home_team: cell(cells, COL_HOME).to_string(),
        away_team: cell(cells, COL_AWAY).to_string(),
        odds: parse_odds(cell(cells, COL_ODDS)),
        stake: parse_stake(cell(cells, COL_STAKE)),
        result: BetOutcome::classify(cell(cells, COL_RESULT)),
    }
}

/// Parse all bet rows, preserving sheet order (the order is the
/// chronology — there is no timestamp sort).
pub fn parse_bets(rows: &[Vec<String>]) -> Vec<BetRecord> {
    rows.iter().map(|r| parse_bet_row(r)).collect()
}

/// Parse one competition row. Rows with an empty name or a non-positive
/// default stake are unusable as pools and are skipped.
pub fn parse_competition_row(cells: &[String]) -> Option<Competition> {
    let name = cell(cells, COL_COMP_NAME);
    if name.is_empty() {
        return None;
    }

    let default_stake = parse_number(cell(cells, COL_COMP_STAKE))?;
    if default_stake <= Decimal::ZERO {
        return None;
    }

    let status = cell(cells, COL_COMP_STATUS)
        .parse::<CompetitionStatus>()
        .unwrap_or(CompetitionStatus::Active);

    let opt = |s: &str| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    };

    Some(Competition {
        name: name.to_string(),
        default_stake,
        status,
        color: opt(cell(cells, COL_COMP_COLOR)),
        logo_url: opt(cell(cells, COL_COMP_LOGO)),
    })
}

/// Parse all competition rows, skipping unusable ones.
pub fn parse_competitions(rows: &[Vec<String>]) -> Vec<Competition> {
    rows.iter().filter_map(|r| parse_competition_row(r)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
