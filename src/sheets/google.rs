//! Google Sheets integration.
//!
//! Talks to the spreadsheet values API: range reads for the snapshot,
//! an append for new rows, and single-cell updates for result patches.
//!
//! API docs: https://developers.google.com/sheets/api/reference/rest
//! Base URL: https://sheets.googleapis.com/v4/spreadsheets/
//! Auth: `Authorization: Bearer {token}` on every call. Obtaining the
//! token (service account or OAuth) is the operator's problem; the
//! client takes it ready-made.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use super::{RawRow, RowStore};
use crate::ingest::{COL_COMP_STATUS_LETTER, COL_RESULT_LETTER};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const STORE_NAME: &str = "google";

// ---------------------------------------------------------------------------
// API response types (Sheets JSON → Rust)
// ---------------------------------------------------------------------------

/// The shape returned by `GET .../values/{range}`. With formatted
/// rendering every cell arrives as text, which is exactly what the
/// ingest layer wants. `values` is absent entirely for empty ranges.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<RawRow>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Google Sheets row store.
pub struct GoogleSheetsClient {
    http: Client,
    spreadsheet_id: String,
    token: SecretString,
    /// Bet rows range, e.g. `Bets!A2:G` (data starts below the header).
    bets_range: String,
    /// Competition rows range, e.g. `Competitions!A2:E`.
    competitions_range: String,
}

impl GoogleSheetsClient {
    pub fn new(
        spreadsheet_id: String,
        token: SecretString,
        bets_range: String,
        competitions_range: String,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("PUNTER/0.1.0 (bankroll-tracker)")
            .build()
            .context("Failed to build HTTP client for Google Sheets")?;

        Ok(Self {
            http,
            spreadsheet_id,
            token,
            bets_range,
            competitions_range,
        })
    }

    // -- Internal helpers ------------------------------------------------

    fn values_url(&self, range: &str) -> String {
        format!(
            "{BASE_URL}/{}/values/{}",
            self.spreadsheet_id,
            urlencoding::encode(range),
        )
    }

    async fn fetch_range(&self, range: &str) -> Result<Vec<RawRow>> {
        let url = self.values_url(range);
        debug!(url = %url, "Fetching sheet range");

        let resp = self
            .http
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .context("Sheets API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Sheets API error {status}: {body}");
        }

        let range: ValueRange = resp
            .json()
            .await
            .context("Failed to parse Sheets values response")?;

        Ok(range.values)
    }

    /// Write a single-cell or row value with RAW input (no formula
    /// interpretation of user text).
    async fn put_values(&self, range: &str, values: Vec<RawRow>) -> Result<()> {
        let url = format!("{}?valueInputOption=RAW", self.values_url(range));
        let body = serde_json::json!({ "values": values });

        let resp = self
            .http
            .put(&url)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await
            .context("Sheets update request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Sheets update failed {status}: {body}");
        }

        Ok(())
    }

    async fn append_row(&self, range: &str, row: RawRow) -> Result<()> {
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url(range),
        );
        let body = serde_json::json!({ "values": [row] });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await
            .context("Sheets append request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Sheets append failed {status}: {body}");
        }

        Ok(())
    }

    /// Split an A1 range like `Bets!A2:G` into its sheet name and first
    /// data row. Ranges without an explicit row start at 1.
    fn range_origin(range: &str) -> (&str, u32) {
        let (sheet, cells) = range.split_once('!').unwrap_or(("Sheet1", range));
        let first_ref = cells.split(':').next().unwrap_or(cells);
        let digits: String = first_ref.chars().filter(|c| c.is_ascii_digit()).collect();
        let row = digits.parse::<u32>().unwrap_or(1);
        (sheet, row)
    }

    /// A1 reference of a single cell: `column` letter at data-row
    /// offset `index` within `range`.
    fn cell_ref(range: &str, column: char, index: usize) -> String {
        let (sheet, first_row) = Self::range_origin(range);
        format!("{sheet}!{column}{}", first_row as usize + index)
    }
}

// ---------------------------------------------------------------------------
// RowStore trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl RowStore for GoogleSheetsClient {
    async fn fetch_bet_rows(&self) -> Result<Vec<RawRow>> {
        let rows = self.fetch_range(&self.bets_range).await?;
        debug!(count = rows.len(), "Bet rows fetched");
        Ok(rows)
    }

    async fn fetch_competition_rows(&self) -> Result<Vec<RawRow>> {
        let rows = self.fetch_range(&self.competitions_range).await?;
        debug!(count = rows.len(), "Competition rows fetched");
        Ok(rows)
    }

    async fn append_bet_row(&self, row: RawRow) -> Result<()> {
        self.append_row(&self.bets_range, row).await?;
        info!("Bet row appended");
        Ok(())
    }

    async fn update_result(&self, index: usize, result_text: &str) -> Result<()> {
        let cell = Self::cell_ref(&self.bets_range, COL_RESULT_LETTER, index);
        self.put_values(&cell, vec![vec![result_text.to_string()]])
            .await?;
        info!(cell = %cell, result = result_text, "Result cell patched");
        Ok(())
    }

    async fn append_competition_row(&self, row: RawRow) -> Result<()> {
        self.append_row(&self.competitions_range, row).await?;
        info!("Competition row appended");
        Ok(())
    }

    async fn update_competition_status(&self, index: usize, status_text: &str) -> Result<()> {
        let cell = Self::cell_ref(&self.competitions_range, COL_COMP_STATUS_LETTER, index);
        self.put_values(&cell, vec![vec![status_text.to_string()]])
            .await?;
        info!(cell = %cell, status = status_text, "Competition status patched");
        Ok(())
    }

    fn name(&self) -> &str {
        STORE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client() -> GoogleSheetsClient {
        GoogleSheetsClient::new(
            "sheet-id-123".to_string(),
            SecretString::new("test-token".to_string()),
            "Bets!A2:G".to_string(),
            "Competitions!A2:E".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_range_origin() {
        assert_eq!(GoogleSheetsClient::range_origin("Bets!A2:G"), ("Bets", 2));
        assert_eq!(
            GoogleSheetsClient::range_origin("Competitions!A10:E20"),
            ("Competitions", 10),
        );
        // No explicit row → first row.
        assert_eq!(GoogleSheetsClient::range_origin("Bets!A:G"), ("Bets", 1));
    }

    #[test]
    fn test_cell_ref_offsets_from_range_start() {
        // Data starts at row 2; index 0 is row 2, index 3 is row 5.
        assert_eq!(
            GoogleSheetsClient::cell_ref("Bets!A2:G", COL_RESULT_LETTER, 0),
            "Bets!F2",
        );
        assert_eq!(
            GoogleSheetsClient::cell_ref("Bets!A2:G", COL_RESULT_LETTER, 3),
            "Bets!F5",
        );
    }

    #[test]
    fn test_cell_ref_competition_status() {
        assert_eq!(
            GoogleSheetsClient::cell_ref("Competitions!A2:E", COL_COMP_STATUS_LETTER, 1),
            "Competitions!C3",
        );
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = make_client();
        let url = client.values_url("Bets!A2:G");
        assert!(url.starts_with("https://sheets.googleapis.com/v4/spreadsheets/sheet-id-123/values/"));
        assert!(url.contains("Bets%21A2%3AG"));
    }

    #[test]
    fn test_client_construction() {
        let client = make_client();
        assert_eq!(client.name(), "google");
    }

    #[test]
    fn test_value_range_missing_values_is_empty() {
        let parsed: ValueRange = serde_json::from_str(r#"{"range":"Bets!A2:G"}"#).unwrap();
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn test_value_range_parses_rows() {
        let parsed: ValueRange = serde_json::from_str(
            r#"{"values":[["2026-03-01","Serie A","Roma","Lazio","3.1","Draw (X)","30"]]}"#,
        )
        .unwrap();
        assert_eq!(parsed.values.len(), 1);
        assert_eq!(parsed.values[0][1], "Serie A");
    }
}
