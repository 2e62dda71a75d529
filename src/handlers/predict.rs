use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::dto::{LedgerResponse, PredictResponse};
use crate::error::{AppError, AppResult};
use crate::recognition::{ImageUpload, RecognitionError};
use crate::AppState;

/// Upload a photo, recognize it and log the first candidate.
///
/// Recognition failures are not HTTP errors: the response carries
/// `recognized: false` and the ledger is left as it was.
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<PredictResponse>> {
    let upload = read_upload(&mut multipart).await?;
    upload.validate().map_err(AppError::Validation)?;

    let file_name = upload.file_name.clone();
    // The ledger lock is not held while the service is working
    let result = state.recognizer.recognize(upload).await;

    let mut ledger = state.ledger.lock().await;
    match result {
        Ok(recognition) => {
            let food = recognition.primary().clone();
            ledger
                .record_entry(&food.food, i64::from(food.calories))
                .await?;
            tracing::info!(
                file = %file_name,
                food = %food.food,
                calories = food.calories,
                candidates = recognition.items().len(),
                candidates_total_calories = recognition.total_calories(),
                "Food recognized"
            );

            Ok(Json(PredictResponse {
                recognized: true,
                food: Some(food),
                candidates: recognition.items().to_vec(),
                message: None,
                ledger: LedgerResponse::from(&*ledger),
            }))
        }
        Err(e) => {
            tracing::warn!(file = %file_name, error = %e, "Food recognition failed");
            ledger.refresh_day().await?;

            Ok(Json(PredictResponse {
                recognized: false,
                food: None,
                candidates: Vec::new(),
                message: Some(unrecognized_message(&e).into()),
                ledger: LedgerResponse::from(&*ledger),
            }))
        }
    }
}

async fn read_upload(multipart: &mut Multipart) -> AppResult<ImageUpload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field.bytes().await.map_err(multipart_error)?;
        return Ok(ImageUpload {
            file_name,
            content_type,
            body,
        });
    }
    Err(AppError::Validation("Multipart field `file` is required".into()))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(e.body_text())
    }
}

fn unrecognized_message(e: &RecognitionError) -> &'static str {
    match e {
        RecognitionError::NoCandidates => "Food not recognized. Try a clearer image.",
        RecognitionError::Transport(_)
        | RecognitionError::Status { .. }
        | RecognitionError::Malformed(_) => "Recognition service is unavailable. Try again later.",
    }
}
