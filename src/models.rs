//! Data models for student health records.
//!
//! This module contains the core data structures used throughout
//! the application: identifiers, BMI categories, the raw input for a
//! new student, and the persisted student record.

use crate::analysis::{classify_bmi, compute_bmi};
use crate::validation::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// BMI category band.
///
/// Variants are declared in band order, so `Ord` follows increasing BMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    /// BMI below 18.5
    Underweight,
    /// BMI from 18.5 up to (not including) 25.0
    Normal,
    /// BMI from 25.0 up to (not including) 30.0
    Overweight,
    /// BMI of 30.0 and above
    Obese,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmiCategory::Underweight => write!(f, "Underweight"),
            BmiCategory::Normal => write!(f, "Normal"),
            BmiCategory::Overweight => write!(f, "Overweight"),
            BmiCategory::Obese => write!(f, "Obese"),
        }
    }
}

impl BmiCategory {
    /// All categories in band order.
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    /// Returns an emoji indicator for the category.
    pub fn emoji(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "🟠",
            BmiCategory::Normal => "🟢",
            BmiCategory::Overweight => "🟠",
            BmiCategory::Obese => "🔴",
        }
    }
}

/// Opaque student identifier.
///
/// Generated from the creation timestamp in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Creates an identifier from a creation timestamp.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StudentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Student details as entered by the teacher, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    /// Full name.
    pub name: String,
    /// Class number (1-10).
    pub class_number: u8,
    /// Roll number within the class.
    pub roll_no: u32,
    /// Weight in kilograms.
    pub weight_kg: f64,
    /// Height in centimeters.
    pub height_cm: f64,
    /// Age in years.
    pub age: u32,
}

/// A student's identity and latest health snapshot.
///
/// Fields are private: the BMI and its category are always derived from the
/// record's own weight and height, both when the record is created and when
/// it is read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredStudent")]
pub struct StudentRecord {
    id: StudentId,
    name: String,
    #[serde(rename = "class")]
    class_number: u8,
    roll_no: u32,
    #[serde(rename = "weight")]
    weight_kg: f64,
    #[serde(rename = "height")]
    height_cm: f64,
    age: u32,
    bmi: f64,
    bmi_category: BmiCategory,
    created_at: DateTime<Utc>,
}

impl StudentRecord {
    /// Validates the details and builds a record with derived BMI fields.
    pub fn new(
        id: StudentId,
        details: NewStudent,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        details.validate()?;

        let bmi = compute_bmi(details.weight_kg, details.height_cm);

        Ok(Self {
            id,
            name: details.name.trim().to_string(),
            class_number: details.class_number,
            roll_no: details.roll_no,
            weight_kg: details.weight_kg,
            height_cm: details.height_cm,
            age: details.age,
            bmi,
            bmi_category: classify_bmi(bmi),
            created_at,
        })
    }

    /// Builds the replacement for this record, keeping its identity and
    /// creation time.
    pub fn replaced_with(&self, details: NewStudent) -> Result<Self, ValidationError> {
        Self::new(self.id.clone(), details, self.created_at)
    }

    pub fn id(&self) -> &StudentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_number(&self) -> u8 {
        self.class_number
    }

    pub fn roll_no(&self) -> u32 {
        self.roll_no
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// BMI rounded to one decimal.
    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn bmi_category(&self) -> BmiCategory {
        self.bmi_category
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// On-disk shape of a student record.
///
/// The stored BMI fields are only compared against the recomputed values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredStudent {
    id: StudentId,
    name: String,
    #[serde(rename = "class")]
    class_number: u8,
    roll_no: u32,
    #[serde(rename = "weight")]
    weight_kg: f64,
    #[serde(rename = "height")]
    height_cm: f64,
    age: u32,
    #[serde(default)]
    bmi: Option<f64>,
    #[serde(default)]
    bmi_category: Option<BmiCategory>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoredStudent> for StudentRecord {
    type Error = ValidationError;

    fn try_from(stored: StoredStudent) -> Result<Self, Self::Error> {
        let details = NewStudent {
            name: stored.name,
            class_number: stored.class_number,
            roll_no: stored.roll_no,
            weight_kg: stored.weight_kg,
            height_cm: stored.height_cm,
            age: stored.age,
        };
        let record = Self::new(stored.id, details, stored.created_at)?;

        let bmi_drifted = stored.bmi.is_some_and(|b| b != record.bmi);
        let category_drifted = stored
            .bmi_category
            .is_some_and(|c| c != record.bmi_category);

        if bmi_drifted || category_drifted {
            warn!(
                "Stored BMI for student {} does not match weight/height; using {} ({})",
                record.id, record.bmi, record.bmi_category
            );
        }

        Ok(record)
    }
}
