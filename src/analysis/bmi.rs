//! BMI calculation and classification.

use crate::models::BmiCategory;

/// Lower bound of the Normal band.
pub const NORMAL_MIN: f64 = 18.5;
/// Lower bound of the Overweight band.
pub const OVERWEIGHT_MIN: f64 = 25.0;
/// Lower bound of the Obese band.
pub const OBESE_MIN: f64 = 30.0;

/// Compute BMI from weight (kg) and height (cm), rounded to one decimal.
///
/// Callers must validate that both measurements are positive.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round_to_tenth(weight_kg / (height_m * height_m))
}

/// Classify a BMI value. Bands are checked lowest first.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < NORMAL_MIN {
        BmiCategory::Underweight
    } else if bmi < OVERWEIGHT_MIN {
        BmiCategory::Normal
    } else if bmi < OBESE_MIN {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Round to one decimal place, halfway cases away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
