use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{LedgerResponse, RecordEntryRequest};
use crate::error::AppResult;
use crate::AppState;

pub async fn get_ledger(State(state): State<AppState>) -> AppResult<Json<LedgerResponse>> {
    let mut ledger = state.ledger.lock().await;
    ledger.refresh_day().await?;
    Ok(Json(LedgerResponse::from(&*ledger)))
}

pub async fn record_entry(
    State(state): State<AppState>,
    Json(body): Json<RecordEntryRequest>,
) -> AppResult<Json<LedgerResponse>> {
    body.validate()?;

    let mut ledger = state.ledger.lock().await;
    ledger.record_entry(&body.name, body.calories).await?;
    Ok(Json(LedgerResponse::from(&*ledger)))
}
