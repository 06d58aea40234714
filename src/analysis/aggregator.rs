//! Roster aggregation and statistics.
//!
//! This module computes summary statistics over a snapshot of student
//! records: category and class distributions, BMI averages and extremes,
//! and category percentages.

use super::bmi::round_to_tenth;
use crate::models::{BmiCategory, StudentRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics over a collection of student records.
///
/// All numeric fields are `0.0` for an empty collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of records.
    pub total_count: usize,
    /// Number of distinct classes.
    pub class_count: usize,
    /// Records per BMI category. Categories with no records are absent.
    pub category_distribution: BTreeMap<BmiCategory, usize>,
    /// Records per class number.
    pub class_distribution: BTreeMap<u8, usize>,
    /// Mean BMI per class number, rounded to one decimal.
    pub average_bmi_by_class: BTreeMap<u8, f64>,
    /// Mean BMI over all records, rounded to one decimal.
    pub global_average_bmi: f64,
    /// Lowest BMI.
    pub global_min_bmi: f64,
    /// Highest BMI.
    pub global_max_bmi: f64,
    /// Share of Normal records, in percent (one decimal).
    pub normal_percentage: f64,
    /// Share of Underweight records, in percent (one decimal).
    pub underweight_percentage: f64,
    /// Share of Overweight records, in percent (one decimal).
    pub overweight_percentage: f64,
    /// Share of Obese records, in percent (one decimal).
    pub obese_percentage: f64,
}

impl Statistics {
    /// Creates statistics from a list of records.
    pub fn from_students(students: &[StudentRecord]) -> Self {
        let mut stats = Self {
            total_count: students.len(),
            ..Self::default()
        };

        if students.is_empty() {
            return stats;
        }

        let mut class_totals: BTreeMap<u8, f64> = BTreeMap::new();
        let mut bmi_total = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for student in students {
            let bmi = student.bmi();

            *stats
                .category_distribution
                .entry(student.bmi_category())
                .or_insert(0) += 1;
            *stats
                .class_distribution
                .entry(student.class_number())
                .or_insert(0) += 1;
            *class_totals.entry(student.class_number()).or_insert(0.0) += bmi;

            bmi_total += bmi;
            min = min.min(bmi);
            max = max.max(bmi);
        }

        stats.class_count = stats.class_distribution.len();
        stats.average_bmi_by_class = class_totals
            .into_iter()
            .map(|(class, total)| {
                let count = stats.class_distribution.get(&class).copied().unwrap_or(0);
                (class, mean(total, count))
            })
            .collect();

        stats.global_average_bmi = mean(bmi_total, stats.total_count);
        stats.global_min_bmi = min;
        stats.global_max_bmi = max;

        stats.normal_percentage = stats.percentage(BmiCategory::Normal);
        stats.underweight_percentage = stats.percentage(BmiCategory::Underweight);
        stats.overweight_percentage = stats.percentage(BmiCategory::Overweight);
        stats.obese_percentage = stats.percentage(BmiCategory::Obese);

        stats
    }

    /// Number of records in a category.
    pub fn category_count(&self, category: BmiCategory) -> usize {
        self.category_distribution
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    /// Share of records in a category, in percent rounded to one decimal.
    pub fn percentage(&self, category: BmiCategory) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        round_to_tenth(self.category_count(category) as f64 / self.total_count as f64 * 100.0)
    }

    /// Whole-number percentage of records in the Normal band.
    pub fn health_rate(&self) -> u32 {
        if self.total_count == 0 {
            return 0;
        }
        let rate = self.category_count(BmiCategory::Normal) as f64 / self.total_count as f64;
        (rate * 100.0).round() as u32
    }

    /// Class averages as a sequence in ascending class order.
    pub fn class_averages(&self) -> Vec<(u8, f64)> {
        self.average_bmi_by_class
            .iter()
            .map(|(class, avg)| (*class, *avg))
            .collect()
    }
}

/// Aggregate a snapshot of records into summary statistics.
pub fn aggregate(students: &[StudentRecord]) -> Statistics {
    Statistics::from_students(students)
}

/// Per-class breakdown used by the analytics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    /// Class number.
    pub class_number: u8,
    /// Number of students in the class.
    pub count: usize,
    /// Mean BMI in the class, rounded to one decimal.
    pub average_bmi: f64,
    /// Students per BMI category within the class.
    pub categories: BTreeMap<BmiCategory, usize>,
}

/// Group records by class number, preserving input order within a class.
pub fn group_by_class(students: &[StudentRecord]) -> BTreeMap<u8, Vec<&StudentRecord>> {
    let mut grouped: BTreeMap<u8, Vec<&StudentRecord>> = BTreeMap::new();

    for student in students {
        grouped
            .entry(student.class_number())
            .or_default()
            .push(student);
    }

    grouped
}

/// Summarize each class, in ascending class order.
pub fn class_summaries(students: &[StudentRecord]) -> Vec<ClassSummary> {
    group_by_class(students)
        .into_iter()
        .map(|(class_number, members)| {
            let mut categories = BTreeMap::new();
            let mut total = 0.0;

            for student in &members {
                *categories.entry(student.bmi_category()).or_insert(0) += 1;
                total += student.bmi();
            }

            ClassSummary {
                class_number,
                count: members.len(),
                average_bmi: mean(total, members.len()),
                categories,
            }
        })
        .collect()
}

/// Mean rounded to one decimal; `0.0` when there is nothing to average.
fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to_tenth(total / count as f64)
}
