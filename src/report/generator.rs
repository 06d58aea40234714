//! Report generation.
//!
//! This module renders the analytics report (Markdown or JSON) and the
//! plain-text views printed by the CLI: roster table, student detail and
//! dashboard.

use crate::analysis::{ClassSummary, Statistics};
use crate::models::{BmiCategory, StudentRecord};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Where the roster was read from.
    pub data_source: String,
    /// Number of students covered.
    pub total_students: usize,
}

/// The complete analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Roster-wide statistics.
    pub statistics: Statistics,
    /// Per-class breakdown, ascending by class. Empty when disabled.
    pub classes: Vec<ClassSummary>,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &HealthReport) -> String {
    let mut output = String::new();

    output.push_str("# MediTrackr Health Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_overview_section(&report.statistics));

    if report.statistics.total_count == 0 {
        output.push_str("## Analytics\n\n");
        output.push_str("No data to display. Add students to see analytics.\n\n");
    } else {
        output.push_str(&generate_category_section(&report.statistics));
        output.push_str(&generate_class_section(&report.statistics));
        output.push_str(&generate_health_section(&report.statistics));
        output.push_str(&generate_breakdown_section(&report.classes));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Data Source:** `{}`\n", metadata.data_source));
    section.push_str(&format!("- **Students:** {}\n\n", metadata.total_students));

    section
}

/// Generate the overview section.
fn generate_overview_section(stats: &Statistics) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Total Students | Avg BMI | Classes |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {:.1} | {} |\n\n",
        stats.total_count, stats.global_average_bmi, stats.class_count
    ));

    section
}

/// Generate the BMI category distribution section.
fn generate_category_section(stats: &Statistics) -> String {
    let mut section = String::new();

    section.push_str("## BMI Category Distribution\n\n");
    section.push_str("| Category | Students | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for (category, count) in &stats.category_distribution {
        section.push_str(&format!(
            "| {} {} | {} | {:.1}% |\n",
            category.emoji(),
            category,
            count,
            stats.percentage(*category)
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-class count and average sections.
fn generate_class_section(stats: &Statistics) -> String {
    let mut section = String::new();

    section.push_str("## Students by Class\n\n");
    section.push_str("| Class | Students |\n");
    section.push_str("|:---:|:---:|\n");
    for (class, count) in &stats.class_distribution {
        section.push_str(&format!("| {} | {} |\n", class, count));
    }
    section.push('\n');

    section.push_str("## Average BMI by Class\n\n");
    section.push_str("| Class | Avg BMI |\n");
    section.push_str("|:---:|:---:|\n");
    for (class, avg) in stats.class_averages() {
        section.push_str(&format!("| {} | {:.1} |\n", class, avg));
    }
    section.push('\n');

    section
}

/// Generate the health statistics section.
fn generate_health_section(stats: &Statistics) -> String {
    let mut section = String::new();

    section.push_str("## Health Statistics\n\n");
    section.push_str("| Lowest BMI | Highest BMI | Normal BMI | Underweight |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {:.1} | {:.1} | {:.1}% | {:.1}% |\n\n",
        stats.global_min_bmi,
        stats.global_max_bmi,
        stats.normal_percentage,
        stats.underweight_percentage
    ));

    section
}

/// Generate the per-class breakdown section.
fn generate_breakdown_section(classes: &[ClassSummary]) -> String {
    if classes.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Class Breakdown\n\n");
    section.push_str("| Class | Students | Avg BMI |");
    for category in BmiCategory::ALL {
        section.push_str(&format!(" {} |", category));
    }
    section.push_str("\n|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");

    for class in classes {
        section.push_str(&format!(
            "| {} | {} | {:.1} |",
            class.class_number, class.count, class.average_bmi
        ));
        for category in BmiCategory::ALL {
            let count = class.categories.get(&category).copied().unwrap_or(0);
            section.push_str(&format!(" {} |", count));
        }
        section.push('\n');
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by MediTrackr*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &HealthReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render a roster as a Markdown table.
pub fn render_roster(students: &[&StudentRecord]) -> String {
    if students.is_empty() {
        return "No students found.\n".to_string();
    }

    let mut table = String::new();

    table.push_str("| ID | Name | Class | Roll | Age | Weight (kg) | Height (cm) | BMI | Category |\n");
    table.push_str("|:---|:---|:---:|:---:|:---:|:---:|:---:|:---:|:---|\n");

    for student in students {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {:.1} | {} {} |\n",
            escape_cell(student.id().as_str()),
            escape_cell(student.name()),
            student.class_number(),
            student.roll_no(),
            student.age(),
            student.weight_kg(),
            student.height_cm(),
            student.bmi(),
            student.bmi_category().emoji(),
            student.bmi_category()
        ));
    }

    table
}

/// Escape text for use inside a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Render one student's details.
pub fn render_student(student: &StudentRecord) -> String {
    let mut lines = Vec::new();

    lines.push(format!("{} (id {})", student.name(), student.id()));
    lines.push(format!(
        "Class {} • Roll {} • {} years",
        student.class_number(),
        student.roll_no(),
        student.age()
    ));
    lines.push(format!("Weight: {} kg", student.weight_kg()));
    lines.push(format!("Height: {} cm", student.height_cm()));
    lines.push(format!(
        "BMI: {:.1} {} {}",
        student.bmi(),
        student.bmi_category().emoji(),
        student.bmi_category()
    ));
    lines.push(format!(
        "Added: {}",
        student.created_at().format("%Y-%m-%d %H:%M")
    ));

    lines.join("\n")
}

/// Greeting for the local hour of day (0-23).
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning"
    } else if hour < 17 {
        "Good Afternoon"
    } else {
        "Good Evening"
    }
}

/// Render the dashboard summary.
pub fn render_dashboard(stats: &Statistics, hour: u32) -> String {
    let mut lines = Vec::new();

    lines.push(format!("{}, Teacher!", greeting(hour)));
    if stats.total_count > 0 {
        lines.push(format!(
            "You have {} students registered across {} classes",
            stats.total_count, stats.class_count
        ));
    } else {
        lines.push("Start by adding your first student".to_string());
    }

    lines.push(String::new());
    lines.push(format!(
        "Total Students:   {} ({} classes)",
        stats.total_count, stats.class_count
    ));
    lines.push(format!("Average BMI:      {:.1}", stats.global_average_bmi));
    lines.push(format!(
        "Healthy Students: {}",
        stats.category_count(BmiCategory::Normal)
    ));
    lines.push(format!("Health Rate:      {}%", stats.health_rate()));

    lines.join("\n")
}
