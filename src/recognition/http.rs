use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{FoodCandidate, FoodRecognizer, ImageUpload, Recognition, RecognitionError};

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    items: Vec<FoodCandidate>,
}

/// Client for a `/predict` endpoint that takes a multipart `file` field.
#[derive(Debug, Clone)]
pub struct HttpRecognizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecognizer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RecognitionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FoodRecognizer for HttpRecognizer {
    async fn recognize(&self, upload: ImageUpload) -> Result<Recognition, RecognitionError> {
        let part = Part::bytes(upload.body.to_vec())
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Status { status, body });
        }

        let text = response.text().await?;
        let prediction: PredictionResponse = serde_json::from_str(&text)
            .map_err(|e| RecognitionError::Malformed(e.to_string()))?;

        if prediction.status != "success" {
            return Err(RecognitionError::NoCandidates);
        }
        Recognition::new(prediction.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};
    use bytes::Bytes;
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn upload() -> ImageUpload {
        ImageUpload {
            file_name: "plate.jpg".into(),
            content_type: "image/jpeg".into(),
            body: Bytes::from_static(b"\xff\xd8\xff\xe0"),
        }
    }

    fn recognizer(base: &str) -> HttpRecognizer {
        HttpRecognizer::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let r = recognizer("http://localhost:8081/");
        assert_eq!(r.endpoint(), "http://localhost:8081/predict");
    }

    #[tokio::test]
    async fn test_success_response() {
        async fn predict(mut mp: Multipart) -> Json<Value> {
            let field = mp.next_field().await.unwrap().unwrap();
            assert_eq!(field.name(), Some("file"));
            assert_eq!(field.file_name(), Some("plate.jpg"));
            Json(json!({
                "status": "success",
                "items": [{
                    "food": "Pizza",
                    "serving_size": "1 slice",
                    "calories": 285,
                    "protein_g": 12.0,
                    "carbs_g": 36.0,
                    "fat_g": 10.0,
                    "source": "USDA"
                }],
                "total_calories": 285
            }))
        }
        let base = serve(Router::new().route("/predict", post(predict))).await;

        let r = recognizer(&base).recognize(upload()).await.unwrap();
        assert_eq!(r.primary().food, "Pizza");
        assert_eq!(r.primary().calories, 285);
        assert_eq!(r.total_calories(), 285);
    }

    #[tokio::test]
    async fn test_empty_items_is_no_candidates() {
        async fn predict() -> Json<Value> {
            Json(json!({ "status": "success", "items": [], "total_calories": 0 }))
        }
        let base = serve(Router::new().route("/predict", post(predict))).await;

        let err = recognizer(&base).recognize(upload()).await.unwrap_err();
        assert!(matches!(err, RecognitionError::NoCandidates));
    }

    #[tokio::test]
    async fn test_non_success_status_is_no_candidates() {
        async fn predict() -> Json<Value> {
            Json(json!({
                "status": "error",
                "items": [{ "food": "Pizza", "calories": 285 }]
            }))
        }
        let base = serve(Router::new().route("/predict", post(predict))).await;

        let err = recognizer(&base).recognize(upload()).await.unwrap_err();
        assert!(matches!(err, RecognitionError::NoCandidates));
    }

    #[tokio::test]
    async fn test_server_error_is_status() {
        async fn predict() -> (StatusCode, &'static str) {
            (StatusCode::INTERNAL_SERVER_ERROR, "model exploded")
        }
        let base = serve(Router::new().route("/predict", post(predict))).await;

        let err = recognizer(&base).recognize(upload()).await.unwrap_err();
        match err {
            RecognitionError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        async fn predict() -> &'static str {
            "<html>oops</html>"
        }
        let base = serve(Router::new().route("/predict", post(predict))).await;

        let err = recognizer(&base).recognize(upload()).await.unwrap_err();
        assert!(matches!(err, RecognitionError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = recognizer(&format!("http://{}", addr))
            .recognize(upload())
            .await
            .unwrap_err();
        assert!(matches!(err, RecognitionError::Transport(_)));
    }
}
