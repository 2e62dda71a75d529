use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::{FoodCandidate, FoodRecognizer, ImageUpload, Recognition, RecognitionError};

/// (food, serving, kcal, protein g, carbs g, fat g)
const MOCK_TABLE: [(&str, &str, u32, f64, f64, f64); 5] = [
    ("Pizza", "1 slice (107g)", 285, 12.0, 36.0, 10.0),
    ("Burger", "1 burger (226g)", 540, 34.0, 40.0, 27.0),
    ("Salad", "1 bowl (200g)", 150, 4.0, 12.0, 9.0),
    ("Pasta", "1 cup (140g)", 220, 8.0, 43.0, 1.3),
    ("Sushi", "6 pieces (180g)", 300, 12.0, 56.0, 2.5),
];

/// Picks a random dish from a fixed table; used when no recognition service
/// is deployed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockRecognizer;

impl MockRecognizer {
    fn candidate(row: &(&str, &str, u32, f64, f64, f64)) -> FoodCandidate {
        let (food, serving, calories, protein, carbs, fat) = *row;
        FoodCandidate {
            food: food.into(),
            serving_size: serving.into(),
            calories,
            protein_g: protein,
            carbs_g: carbs,
            fat_g: fat,
            source: Some("Mock".into()),
        }
    }
}

#[async_trait]
impl FoodRecognizer for MockRecognizer {
    async fn recognize(&self, upload: ImageUpload) -> Result<Recognition, RecognitionError> {
        let row = MOCK_TABLE
            .choose(&mut rand::thread_rng())
            .ok_or(RecognitionError::NoCandidates)?;
        tracing::debug!(file = %upload.file_name, food = row.0, "Mock recognition");
        Recognition::new(vec![Self::candidate(row)])
    }
}
