//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::SortKey;
use crate::models::NewStudent;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// MediTrackr - student health records for teachers
///
/// Record students' weight, height and age by class, and review BMI
/// categories and class statistics.
///
/// Examples:
///   meditrackr add --name "Asha Rao" --class 4 --roll 12 --weight 28 --height 132 --age 9
///   meditrackr list --class 4 --sort bmi
///   meditrackr stats --format json --output health.json
///   meditrackr bmi --weight 70 --height 175
///   meditrackr init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for .meditrackr.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory where student data is stored
    #[arg(long, global = true, value_name = "DIR", env = "MEDITRACKR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a new student
    Add(StudentArgs),

    /// Replace all details of an existing student
    Update {
        /// Student id
        id: String,

        #[command(flatten)]
        student: StudentArgs,
    },

    /// Delete a student
    Delete {
        /// Student id
        id: String,
    },

    /// Show one student's details
    Show {
        /// Student id
        id: String,
    },

    /// List students
    List {
        /// Only show students in this class
        #[arg(long = "class", value_name = "CLASS")]
        class_number: Option<u8>,

        /// Sort order
        #[arg(long, default_value = "class")]
        sort: SortOrder,
    },

    /// Generate the analytics report
    Stats {
        /// Output format (overrides config)
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the dashboard summary
    Dashboard,

    /// Compute BMI without storing anything
    Bmi {
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,

        /// Height in centimeters
        #[arg(long)]
        height: f64,
    },

    /// Generate a default .meditrackr.toml configuration file
    InitConfig,
}

/// Student details shared by `add` and `update`.
#[derive(clap::Args, Debug, Clone)]
pub struct StudentArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Class number (1-10)
    #[arg(long = "class", value_name = "CLASS")]
    pub class_number: u8,

    /// Roll number
    #[arg(long = "roll", value_name = "ROLL")]
    pub roll_no: u32,

    /// Weight in kilograms
    #[arg(long, value_name = "KG")]
    pub weight: f64,

    /// Height in centimeters
    #[arg(long, value_name = "CM")]
    pub height: f64,

    /// Age in years
    #[arg(long, value_name = "YEARS")]
    pub age: u32,
}

impl From<StudentArgs> for NewStudent {
    fn from(args: StudentArgs) -> Self {
        Self {
            name: args.name,
            class_number: args.class_number,
            roll_no: args.roll_no,
            weight_kg: args.weight,
            height_cm: args.height,
            age: args.age,
        }
    }
}

/// Output format for the analytics report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Sort order for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// By class, then name
    Class,
    /// By name
    Name,
    /// By BMI, highest first
    Bmi,
}

impl From<SortOrder> for SortKey {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Class => SortKey::Class,
            SortOrder::Name => SortKey::Name,
            SortOrder::Bmi => SortKey::Bmi,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        if let Command::List {
            class_number: Some(class_number),
            ..
        } = self.command
        {
            if !crate::validation::CLASS_RANGE.contains(&class_number) {
                return Err(format!("Class must be between 1 and 10 (got {class_number})"));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            command,
            config: None,
            data_dir: None,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "meditrackr", "add", "--name", "Asha Rao", "--class", "4", "--roll", "12", "--weight",
            "28", "--height", "132", "--age", "9",
        ])
        .unwrap();

        let Command::Add(student) = args.command else {
            panic!("expected add command");
        };
        let student = NewStudent::from(student);
        assert_eq!(student.name, "Asha Rao");
        assert_eq!(student.class_number, 4);
        assert_eq!(student.roll_no, 12);
        assert_eq!(student.height_cm, 132.0);
    }

    #[test]
    fn test_parse_list_defaults() {
        let args = Args::try_parse_from(["meditrackr", "list"]).unwrap();

        match args.command {
            Command::List { class_number, sort } => {
                assert_eq!(class_number, None);
                assert_eq!(sort, SortOrder::Class);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["meditrackr", "dashboard", "--verbose"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::Dashboard);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_list_class_range() {
        let args = make_args(Command::List {
            class_number: Some(11),
            sort: SortOrder::Name,
        });
        assert!(args.validate().is_err());

        let args = make_args(Command::List {
            class_number: Some(10),
            sort: SortOrder::Name,
        });
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::Dashboard);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
