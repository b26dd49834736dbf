//! Competition registry.
//!
//! Name → pool metadata lookup for the ledger, plus the CRUD operations
//! the UI layer drives (create a pool, close a pool). The registry is a
//! plain in-memory map rebuilt from the competitions sheet every
//! refresh; persistence happens through the row store, not here.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::ingest;
use crate::types::{Competition, CompetitionStatus, TrackerError};

/// In-memory view of the competitions sheet.
#[derive(Debug, Clone, Default)]
pub struct CompetitionRegistry {
    competitions: HashMap<String, Competition>,
}

impl CompetitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from raw competitions-sheet rows. Unusable rows
    /// are skipped by the ingest layer; duplicate names keep the last
    /// occurrence (matching how the sheet would be read top to bottom).
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        Self::from_competitions(ingest::parse_competitions(rows))
    }

    pub fn from_competitions(competitions: Vec<Competition>) -> Self {
        let competitions = competitions
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        Self { competitions }
    }

    // -- Lookup ----------------------------------------------------------

    pub fn get(&self, name: &str) -> Option<&Competition> {
        self.competitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.competitions.contains_key(name)
    }

    /// Default stake for a pool; None for unknown names (which is what
    /// makes the ledger drop their rows).
    pub fn default_stake(&self, name: &str) -> Option<Decimal> {
        self.competitions.get(name).map(|c| c.default_stake)
    }

    /// All competitions, sorted by name for deterministic output.
    pub fn all(&self) -> Vec<&Competition> {
        let mut comps: Vec<&Competition> = self.competitions.values().collect();
        comps.sort_by(|a, b| a.name.cmp(&b.name));
        comps
    }

    /// Active competitions only — the pools new bets may target.
    pub fn active(&self) -> Vec<&Competition> {
        self.all().into_iter().filter(|c| c.is_active()).collect()
    }

    pub fn len(&self) -> usize {
        self.competitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitions.is_empty()
    }

    // -- Mutation --------------------------------------------------------

    /// Register a new competition. Names are unique.
    pub fn create(&mut self, competition: Competition) -> Result<(), TrackerError> {
        if self.competitions.contains_key(&competition.name) {
            return Err(TrackerError::CompetitionExists(competition.name));
        }
        self.competitions.insert(competition.name.clone(), competition);
        Ok(())
    }

    /// Close a competition. It stays in the registry so its historical
    /// rows keep resolving; only new bets are a UI concern.
    pub fn close(&mut self, name: &str) -> Result<(), TrackerError> {
        match self.competitions.get_mut(name) {
            Some(comp) => {
                comp.status = CompetitionStatus::Closed;
                Ok(())
            }
            None => Err(TrackerError::UnknownCompetition(name.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
