use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Sedentary activity multiplier applied to BMR.
pub const SEDENTARY_FACTOR: f64 = 1.2;

/// Daily calorie offset applied for the lose/bulk goals.
pub const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

/// Selects the Mifflin-St Jeor constant; nothing else depends on it.
/// Anything other than "male" takes the non-male constant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Sex {
    Male,
    Female,
}

impl Default for Sex {
    fn default() -> Self {
        Self::Female
    }
}

impl From<&str> for Sex {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("male") {
            Self::Male
        } else {
            Self::Female
        }
    }
}

impl From<String> for Sex {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Unknown goal names deserialize as `Maintain` rather than failing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Goal {
    Maintain,
    Lose,
    Bulk,
}

impl Default for Goal {
    fn default() -> Self {
        Self::Maintain
    }
}

impl From<&str> for Goal {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "lose" => Self::Lose,
            "bulk" => Self::Bulk,
            _ => Self::Maintain,
        }
    }
}

impl From<String> for Goal {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Height in centimetres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    pub age: u32,
    #[serde(alias = "gender")]
    pub sex: Sex,
    pub goal: Goal,
    pub target_calories: i64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            height: 0.0,
            weight: 0.0,
            age: 0,
            sex: Sex::default(),
            goal: Goal::default(),
            target_calories: 0,
        }
    }
}

impl Profile {
    /// Builds a profile and derives its calorie target. The target is only
    /// ever produced here, so a stored profile always matches its inputs.
    pub fn new(
        height: f64,
        weight: f64,
        age: u32,
        sex: Sex,
        goal: Goal,
    ) -> Result<Self, LedgerError> {
        if !is_positive(height) {
            return Err(LedgerError::Validation(
                "Height must be a positive number".into(),
            ));
        }
        if !is_positive(weight) {
            return Err(LedgerError::Validation(
                "Weight must be a positive number".into(),
            ));
        }
        if age == 0 {
            return Err(LedgerError::Validation(
                "Age must be a positive integer".into(),
            ));
        }

        Ok(Self {
            height,
            weight,
            age,
            sex,
            goal,
            target_calories: target_calories(height, weight, age, sex, goal),
        })
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
pub fn basal_metabolic_rate(height: f64, weight: f64, age: u32, sex: Sex) -> f64 {
    let base = 10.0 * weight + 6.25 * height - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

pub fn total_daily_energy_expenditure(bmr: f64) -> f64 {
    bmr * SEDENTARY_FACTOR
}

pub fn target_calories(height: f64, weight: f64, age: u32, sex: Sex, goal: Goal) -> i64 {
    let tdee = total_daily_energy_expenditure(basal_metabolic_rate(height, weight, age, sex));
    let adjusted = match goal {
        Goal::Lose => tdee - GOAL_ADJUSTMENT_KCAL,
        Goal::Bulk => tdee + GOAL_ADJUSTMENT_KCAL,
        Goal::Maintain => tdee,
    };
    adjusted.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_male_maintain_target() {
        let bmr = basal_metabolic_rate(175.0, 70.0, 25, Sex::Male);
        assert_eq!(bmr, 1673.75);
        assert_eq!(total_daily_energy_expenditure(bmr), 2008.5);

        let p = Profile::new(175.0, 70.0, 25, Sex::Male, Goal::Maintain).unwrap();
        assert_eq!(p.target_calories, 2009);
    }

    #[test]
    fn test_goal_adjustments() {
        let lose = Profile::new(175.0, 70.0, 25, Sex::Male, Goal::Lose).unwrap();
        let bulk = Profile::new(175.0, 70.0, 25, Sex::Male, Goal::Bulk).unwrap();
        assert_eq!(lose.target_calories, 1509);
        assert_eq!(bulk.target_calories, 2509);
    }

    #[test]
    fn test_female_formula() {
        // 10*60 + 6.25*165 - 5*30 - 161 = 1320.25; * 1.2 = 1584.3
        let p = Profile::new(165.0, 60.0, 30, Sex::Female, Goal::Maintain).unwrap();
        assert_eq!(p.target_calories, 1584);
    }

    #[test]
    fn test_target_is_deterministic() {
        let a = target_calories(182.5, 81.3, 41, Sex::Male, Goal::Bulk);
        let b = target_calories(182.5, 81.3, 41, Sex::Male, Goal::Bulk);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_goal_is_maintain() {
        assert_eq!(Goal::from("shred"), Goal::Maintain);
        assert_eq!(Goal::from("LOSE"), Goal::Lose);
        let g: Goal = serde_json::from_str(r#""recomp""#).unwrap();
        assert_eq!(g, Goal::Maintain);
    }

    #[test]
    fn test_sex_is_male_or_non_male() {
        assert_eq!(Sex::from("Male"), Sex::Male);
        assert_eq!(Sex::from(" male "), Sex::Male);
        assert_eq!(Sex::from("female"), Sex::Female);
        assert_eq!(Sex::from("other"), Sex::Female);
        let s: Sex = serde_json::from_str(r#""MALE""#).unwrap();
        assert_eq!(s, Sex::Male);
        let s: Sex = serde_json::from_str(r#""nonbinary""#).unwrap();
        assert_eq!(s, Sex::Female);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        assert!(matches!(
            Profile::new(0.0, 70.0, 25, Sex::Male, Goal::Maintain),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            Profile::new(175.0, -1.0, 25, Sex::Male, Goal::Maintain),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            Profile::new(175.0, 70.0, 0, Sex::Male, Goal::Maintain),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            Profile::new(f64::NAN, 70.0, 25, Sex::Male, Goal::Maintain),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_reads_legacy_shape_with_missing_fields() {
        let json = r#"{"height":180,"weight":75,"gender":"male","goal":"bulk"}"#;
        let p: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(p.sex, Sex::Male);
        assert_eq!(p.goal, Goal::Bulk);
        assert_eq!(p.age, 0);
        assert_eq!(p.target_calories, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let p = Profile::new(175.0, 70.0, 25, Sex::Male, Goal::Lose).unwrap();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["targetCalories"], 1509);
        assert_eq!(v["sex"], "male");
        assert_eq!(v["goal"], "lose");
    }
}
