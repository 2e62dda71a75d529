//! # FoodSnap: request/response DTOs
//!
//! All API contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON (camelCase, like the stored data)
//! - Field-level checks use `validator` derive macros; rules that belong to
//!   the ledger itself (positive profile inputs) are enforced by the ledger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ledger::DailyLedger;
use crate::models::daily_log::{LogEntry, Projection};
use crate::models::profile::{Goal, Sex};
use crate::recognition::FoodCandidate;

// ============================================================================
// Profile
// ============================================================================

/// PUT /api/profile
///
/// Missing numeric fields are read as zero and rejected by the ledger.
#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<u32>,
    #[serde(default, alias = "gender")]
    pub sex: Sex,
    #[serde(default)]
    pub goal: Goal,
}

// ============================================================================
// Ledger
// ============================================================================

/// POST /api/ledger/entries
#[derive(Debug, Deserialize, Validate)]
pub struct RecordEntryRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(range(min = 0, message = "Calories must not be negative"))]
    pub calories: i64,
}

/// GET /api/ledger and every ledger mutation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    pub date: NaiveDate,
    pub eaten: u64,
    /// Chronological
    pub items: Vec<LogEntry>,
    /// Most recent first
    pub log: Vec<LogEntry>,
    pub projection: Option<Projection>,
    pub onboarding_required: bool,
}

impl From<&DailyLedger> for LedgerResponse {
    fn from(ledger: &DailyLedger) -> Self {
        let day = ledger.log();
        Self {
            date: day.date,
            eaten: day.eaten,
            items: day.items.clone(),
            log: day.recent_first().cloned().collect(),
            projection: ledger.projection(),
            onboarding_required: ledger.onboarding_required(),
        }
    }
}

// ============================================================================
// Recognition
// ============================================================================

/// POST /api/predict
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    pub recognized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food: Option<FoodCandidate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<FoodCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub ledger: LedgerResponse,
}

// ============================================================================
// System
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: String,
    pub checks: ReadyzChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyzChecks {
    pub storage: bool,
}
