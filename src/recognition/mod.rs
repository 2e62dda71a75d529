//! Food recognition collaborators.
//!
//! The ledger never classifies images itself. A [`FoodRecognizer`] turns an
//! uploaded photo into nutrition candidates; which implementation backs it is
//! chosen at startup from configuration.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

mod http;
mod mock;

pub use http::HttpRecognizer;
pub use mock::MockRecognizer;

/// Content types accepted for recognition.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("Recognition service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Recognition service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No food recognized")]
    NoCandidates,

    #[error("Malformed recognition response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

impl ImageUpload {
    /// Rejects anything but a non-empty JPEG or PNG.
    pub fn validate(&self) -> Result<(), String> {
        let ct = self.content_type.to_ascii_lowercase();
        if !ACCEPTED_IMAGE_TYPES.contains(&ct.as_str()) {
            return Err("Please upload a valid image file (JPG or PNG)".into());
        }
        if self.body.is_empty() {
            return Err("Uploaded image is empty".into());
        }
        Ok(())
    }
}

/// One nutrition candidate as reported by the recognition service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodCandidate {
    pub food: String,
    #[serde(default = "unknown_serving")]
    pub serving_size: String,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

fn unknown_serving() -> String {
    "Unknown".into()
}

/// Non-empty by construction; the ledger consumes only the first candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recognition {
    items: Vec<FoodCandidate>,
}

impl Recognition {
    /// Drops unnamed candidates; fails if nothing usable is left.
    pub fn new(mut items: Vec<FoodCandidate>) -> Result<Self, RecognitionError> {
        items.retain(|c| !c.food.trim().is_empty());
        if items.is_empty() {
            return Err(RecognitionError::NoCandidates);
        }
        Ok(Self { items })
    }

    pub fn primary(&self) -> &FoodCandidate {
        &self.items[0]
    }

    pub fn items(&self) -> &[FoodCandidate] {
        &self.items
    }

    pub fn total_calories(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.calories)).sum()
    }
}

#[async_trait]
pub trait FoodRecognizer: Send + Sync {
    async fn recognize(&self, upload: ImageUpload) -> Result<Recognition, RecognitionError>;
}
