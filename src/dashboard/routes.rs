//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`
//! and replaced wholesale after every ledger refresh.

use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::report::{CompetitionSummary, Summary};
use crate::types::RowResult;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub summary: RwLock<Summary>,
    pub rows: RwLock<Vec<RowResult>>,
    pub balance_history: RwLock<Vec<BalancePoint>>,
}

impl DashboardState {
    pub fn new(initial: Summary) -> Self {
        let first_point = BalancePoint {
            timestamp: chrono::Utc::now().to_rfc3339(),
            balance: initial.current_balance,
        };
        Self {
            summary: RwLock::new(initial),
            rows: RwLock::new(Vec::new()),
            balance_history: RwLock::new(vec![first_point]),
        }
    }

    /// Swap in the results of a fresh ledger run.
    pub async fn publish(&self, summary: Summary, rows: Vec<RowResult>) {
        self.balance_history.write().await.push(BalancePoint {
            timestamp: chrono::Utc::now().to_rfc3339(),
            balance: summary.current_balance,
        });
        *self.rows.write().await = rows;
        *self.summary.write().await = summary;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalancePoint {
    pub timestamp: String,
    pub balance: Decimal,
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>) -> Json<Summary> {
    Json(state.summary.read().await.clone())
}

/// GET /api/competitions
pub async fn get_competitions(State(state): State<AppState>) -> Json<Vec<CompetitionSummary>> {
    Json(state.summary.read().await.competitions.clone())
}

/// GET /api/bets
pub async fn get_bets(State(state): State<AppState>) -> Json<Vec<RowResult>> {
    let rows = state.rows.read().await;
    // Return the last 200 rows
    let start = rows.len().saturating_sub(200);
    Json(rows[start..].to_vec())
}

/// GET /api/balance-history
pub async fn get_balance_history(State(state): State<AppState>) -> Json<Vec<BalancePoint>> {
    Json(state.balance_history.read().await.clone())
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
