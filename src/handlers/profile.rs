use axum::{extract::State, Json};

use crate::dto::SaveProfileRequest;
use crate::error::{AppError, AppResult};
use crate::models::profile::Profile;
use crate::AppState;

pub async fn get_profile(State(state): State<AppState>) -> AppResult<Json<Profile>> {
    let ledger = state.ledger.lock().await;
    ledger
        .profile()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No profile saved; onboarding required".into()))
}

/// Full replace; the calorie target is always recomputed.
pub async fn save_profile(
    State(state): State<AppState>,
    Json(body): Json<SaveProfileRequest>,
) -> AppResult<Json<Profile>> {
    let mut ledger = state.ledger.lock().await;
    let profile = ledger
        .save_profile(
            body.height.unwrap_or_default(),
            body.weight.unwrap_or_default(),
            body.age.unwrap_or_default(),
            body.sex,
            body.goal,
        )
        .await?;

    Ok(Json(profile))
}
