//! Local file row store.
//!
//! Persists the two cell matrices as a JSON file. Used when no
//! spreadsheet credentials are configured, and as the deterministic
//! store in tests. Every mutation rewrites the file; a missing file
//! means a fresh, empty sheet.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{RawRow, RowStore};
use crate::ingest::{BET_COLUMNS, COL_RESULT};

const STORE_NAME: &str = "file";

/// On-disk shape: the same text-cell matrices a spreadsheet would hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FileSheet {
    bets: Vec<RawRow>,
    competitions: Vec<RawRow>,
}

/// JSON-file row store.
pub struct FileStore {
    path: String,
    sheet: Mutex<FileSheet>,
}

impl FileStore {
    /// Open a store at `path`. A missing file is a fresh start, not an
    /// error; a present but unreadable file is.
    pub fn open(path: &str) -> Result<Self> {
        let sheet = if Path::new(path).exists() {
            let json = std::fs::read_to_string(path)
                .context(format!("Failed to read sheet file {path}"))?;
            let sheet: FileSheet = serde_json::from_str(&json)
                .context(format!("Failed to parse sheet file {path}"))?;
            info!(
                path,
                bets = sheet.bets.len(),
                competitions = sheet.competitions.len(),
                "Sheet file loaded"
            );
            sheet
        } else {
            info!(path, "No sheet file found, starting empty");
            FileSheet::default()
        };

        Ok(Self {
            path: path.to_string(),
            sheet: Mutex::new(sheet),
        })
    }

    fn persist(&self, sheet: &FileSheet) -> Result<()> {
        let json = serde_json::to_string_pretty(sheet)
            .context("Failed to serialise sheet")?;
        std::fs::write(&self.path, &json)
            .context(format!("Failed to write sheet file {}", self.path))?;
        debug!(path = %self.path, "Sheet file saved");
        Ok(())
    }
}

#[async_trait]
impl RowStore for FileStore {
    async fn fetch_bet_rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.sheet.lock().await.bets.clone())
    }

    async fn fetch_competition_rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.sheet.lock().await.competitions.clone())
    }

    async fn append_bet_row(&self, row: RawRow) -> Result<()> {
        let mut sheet = self.sheet.lock().await;
        sheet.bets.push(row);
        self.persist(&sheet)
    }

    async fn update_result(&self, index: usize, result_text: &str) -> Result<()> {
        let mut sheet = self.sheet.lock().await;
        let row = sheet
            .bets
            .get_mut(index)
            .with_context(|| format!("No bet row at index {index}"))?;

        // Freshly appended rows may be short of the result column.
        if row.len() < BET_COLUMNS {
            row.resize(BET_COLUMNS, String::new());
        }
        row[COL_RESULT] = result_text.to_string();

        self.persist(&sheet)
    }

    async fn append_competition_row(&self, row: RawRow) -> Result<()> {
        let mut sheet = self.sheet.lock().await;
        sheet.competitions.push(row);
        self.persist(&sheet)
    }

    async fn update_competition_status(&self, index: usize, status_text: &str) -> Result<()> {
        let mut sheet = self.sheet.lock().await;
        let row = sheet
            .competitions
            .get_mut(index)
            .with_context(|| format!("No competition row at index {index}"))?;

        const STATUS_COLUMNS: usize = 3; // Name, Default Stake, Status
        if row.len() < STATUS_COLUMNS {
            row.resize(STATUS_COLUMNS, String::new());
        }
        row[STATUS_COLUMNS - 1] = status_text.to_string();

        self.persist(&sheet)
    }

    fn name(&self) -> &str {
        STORE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
