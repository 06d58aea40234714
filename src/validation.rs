//! Input validation for student details.
//!
//! Every check here runs before BMI is computed, so the calculator only
//! ever sees positive, finite measurements.

use crate::models::NewStudent;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Class numbers accepted by the roster.
pub const CLASS_RANGE: RangeInclusive<u8> = 1..=10;

/// Reasons a student's details are rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("student name must not be empty")]
    EmptyName,

    #[error("class must be between 1 and 10 (got {0})")]
    InvalidClass(u8),

    #[error("roll number must be at least 1")]
    InvalidRollNo,

    #[error("weight must be a positive number of kilograms (got {0})")]
    InvalidWeight(f64),

    #[error("height must be a positive number of centimeters (got {0})")]
    InvalidHeight(f64),

    #[error("age must be a positive number of years")]
    InvalidAge,
}

impl NewStudent {
    /// Validate the details, reporting the first problem found.
    ///
    /// Checks run in form order: name, class, roll number, weight, height, age.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        if !CLASS_RANGE.contains(&self.class_number) {
            return Err(ValidationError::InvalidClass(self.class_number));
        }

        if self.roll_no < 1 {
            return Err(ValidationError::InvalidRollNo);
        }

        validate_measurements(self.weight_kg, self.height_cm)?;

        if self.age < 1 {
            return Err(ValidationError::InvalidAge);
        }

        Ok(())
    }
}

/// Check that weight and height can be fed to the BMI calculator.
pub fn validate_measurements(weight_kg: f64, height_cm: f64) -> Result<(), ValidationError> {
    if !is_positive(weight_kg) {
        return Err(ValidationError::InvalidWeight(weight_kg));
    }

    if !is_positive(height_cm) {
        return Err(ValidationError::InvalidHeight(height_cm));
    }

    Ok(())
}

/// True for finite values strictly greater than zero (rejects NaN).
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewStudent {
        NewStudent {
            name: "Kabir".to_string(),
            class_number: 6,
            roll_no: 14,
            weight_kg: 38.5,
            height_cm: 142.0,
            age: 11,
        }
    }

    #[test]
    fn test_valid_details() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_blank_name() {
        let mut student = valid();
        student.name = "   ".to_string();
        assert_eq!(student.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_class_bounds() {
        let mut student = valid();

        student.class_number = 0;
        assert_eq!(student.validate(), Err(ValidationError::InvalidClass(0)));

        student.class_number = 11;
        assert_eq!(student.validate(), Err(ValidationError::InvalidClass(11)));

        student.class_number = 1;
        assert!(student.validate().is_ok());

        student.class_number = 10;
        assert!(student.validate().is_ok());
    }

    #[test]
    fn test_non_positive_measurements() {
        let mut student = valid();
        student.weight_kg = 0.0;
        assert_eq!(student.validate(), Err(ValidationError::InvalidWeight(0.0)));

        let mut student = valid();
        student.height_cm = -150.0;
        assert_eq!(
            student.validate(),
            Err(ValidationError::InvalidHeight(-150.0))
        );

        let mut student = valid();
        student.age = 0;
        assert_eq!(student.validate(), Err(ValidationError::InvalidAge));
    }

    #[test]
    fn test_nan_weight_rejected() {
        let mut student = valid();
        student.weight_kg = f64::NAN;
        assert!(matches!(
            student.validate(),
            Err(ValidationError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_validate_measurements() {
        assert!(validate_measurements(70.0, 175.0).is_ok());
        assert_eq!(
            validate_measurements(70.0, f64::INFINITY),
            Err(ValidationError::InvalidHeight(f64::INFINITY))
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let student = NewStudent {
            name: String::new(),
            class_number: 0,
            roll_no: 0,
            weight_kg: 0.0,
            height_cm: 0.0,
            age: 0,
        };
        assert_eq!(student.validate(), Err(ValidationError::EmptyName));

        let student = NewStudent {
            name: "Zoya".to_string(),
            roll_no: 0,
            ..valid()
        };
        assert_eq!(student.validate(), Err(ValidationError::InvalidRollNo));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::InvalidClass(12).to_string(),
            "class must be between 1 and 10 (got 12)"
        );
        assert_eq!(
            ValidationError::EmptyName.to_string(),
            "student name must not be empty"
        );
    }
}
