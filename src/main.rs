//! MediTrackr - student health records for teachers
//!
//! A CLI tool that records students' weight, height and age by class,
//! derives BMI and BMI category, and reports class health statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (invalid input, unknown student, unreadable data, etc.)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod storage;
mod validation;

use anyhow::{bail, Context, Result};
use chrono::{Local, Timelike, Utc};
use cli::{Args, Command, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::StudentId;
use report::{HealthReport, ReportMetadata};
use storage::{FileStore, StorageError, StudentRepository};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Load configuration; CLI values win over the file
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config);

    info!("MediTrackr v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args.command, &config).await {
        error!("Command failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .meditrackr.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {CONFIG_FILE} already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {CONFIG_FILE}"))?;

    println!("✅ Created {CONFIG_FILE} with default settings.");
    println!("   Edit it to change the data directory and report settings.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {CONFIG_FILE}: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Open the roster stored under the configured data directory.
async fn open_repository(config: &Config) -> Result<StudentRepository<FileStore>> {
    let store = FileStore::new(&config.storage.data_dir);
    debug!("Data directory: {}", store.root().display());

    StudentRepository::open(store, config.storage.key.clone())
        .await
        .with_context(|| format!("Failed to load students from {}", config.storage.data_dir))
}

/// Run one subcommand.
async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Add(student) => {
            let mut repo = open_repository(config).await?;
            let record = repo.add(student.into()).await?;
            println!("✅ Student added successfully!\n");
            println!("{}", report::render_student(&record));
        }
        Command::Update { id, student } => {
            let mut repo = open_repository(config).await?;
            let record = repo
                .update(&StudentId::from(id), student.into())
                .await
                .map_err(with_list_hint)?;
            println!("✅ Student updated.\n");
            println!("{}", report::render_student(&record));
        }
        Command::Delete { id } => {
            let mut repo = open_repository(config).await?;
            let removed = repo
                .delete(&StudentId::from(id))
                .await
                .map_err(with_list_hint)?;
            println!("🗑️  Deleted {} (id {}).", removed.name(), removed.id());
        }
        Command::Show { id } => {
            let repo = open_repository(config).await?;
            let id = StudentId::from(id);
            match repo.find(&id) {
                Some(record) => println!("{}", report::render_student(record)),
                None => bail!(
                    "No student with id '{}'. Run `meditrackr list` to see ids.",
                    id
                ),
            }
        }
        Command::List { class_number, sort } => {
            let repo = open_repository(config).await?;
            let view = analysis::roster(repo.students(), class_number, sort.into());
            print!("{}", report::render_roster(&view));
            println!("\n{} of {} students shown", view.len(), repo.students().len());
        }
        Command::Stats { .. } => {
            let repo = open_repository(config).await?;
            handle_stats(&repo, config)?;
        }
        Command::Dashboard => {
            let repo = open_repository(config).await?;
            let stats = analysis::aggregate(repo.students());
            println!("{}", report::render_dashboard(&stats, Local::now().hour()));
        }
        Command::Bmi { weight, height } => handle_bmi(weight, height)?,
        Command::InitConfig => handle_init_config()?,
    }

    Ok(())
}

/// Handle bmi: compute and classify without touching storage.
fn handle_bmi(weight: f64, height: f64) -> Result<()> {
    validation::validate_measurements(weight, height)?;

    let bmi = analysis::compute_bmi(weight, height);
    let category = analysis::classify_bmi(bmi);
    println!("BMI: {:.1} {} {}", bmi, category.emoji(), category);
    Ok(())
}

/// Handle stats: build the analytics report and write it out.
fn handle_stats(repo: &StudentRepository<FileStore>, config: &Config) -> Result<()> {
    let students = repo.students();
    let statistics = analysis::aggregate(students);

    if statistics.total_count == 0 {
        warn!("No students recorded yet; the report will be empty");
    }

    let classes = if config.report.include_class_breakdown {
        analysis::class_summaries(students)
    } else {
        Vec::new()
    };

    let health_report = HealthReport {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            data_source: FileStore::new(&config.storage.data_dir)
                .path_for(&config.storage.key)
                .display()
                .to_string(),
            total_students: statistics.total_count,
        },
        statistics,
        classes,
    };

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&health_report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&health_report),
    };

    match config.report.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path))?;
            println!("✅ Report saved to: {}", path);
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Point the user at `list` when an id is unknown.
fn with_list_hint(e: StorageError) -> anyhow::Error {
    match e {
        StorageError::NotFound(_) => anyhow::anyhow!("{}. Run `meditrackr list` to see ids.", e),
        other => other.into(),
    }
}
