//! `edt` -- run schedule validation and analytics over a portfolio
//! snapshot file.
//!
//! The snapshot is the JSON form of [`edt_storage::SnapshotData`]; it is
//! loaded into the in-memory gateway and every subcommand runs the same
//! engine entry points the web application calls in-process.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use time::macros::format_description;
use time::Date;

use edt_core::ValidationStage;
use edt_storage::{InMemoryGateway, SnapshotData, WorkPackageFilter};

/// Validation stage selector for `validate --stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StageArg {
    Project,
    Phases,
    WorkPackages,
    Activities,
    Tasks,
    Dependencies,
}

impl From<StageArg> for ValidationStage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Project => ValidationStage::Project,
            StageArg::Phases => ValidationStage::Phases,
            StageArg::WorkPackages => ValidationStage::WorkPackages,
            StageArg::Activities => ValidationStage::Activities,
            StageArg::Tasks => ValidationStage::Tasks,
            StageArg::Dependencies => ValidationStage::Dependencies,
        }
    }
}

/// EDT schedule validation and analytics toolchain.
#[derive(Parser)]
#[command(name = "edt", version, about = "EDT schedule validation and analytics")]
struct Cli {
    /// Path to the portfolio snapshot JSON file
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one project's schedule hierarchy and dependencies
    Validate {
        /// Project id to validate
        project_id: i64,
        /// Restrict to specific stages (repeatable). Default: all stages.
        #[arg(long, value_enum)]
        stage: Vec<StageArg>,
    },

    /// Aggregate KPIs for a project or the whole portfolio
    Kpis {
        /// Project id (omit for portfolio scope)
        #[arg(long)]
        project: Option<i64>,
        /// Restrict to one category id
        #[arg(long)]
        category: Option<i64>,
        /// Restrict to one responsible person id
        #[arg(long)]
        responsible: Option<i64>,
        /// Earliest planned start, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// Latest planned end, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
    },

    /// Monthly completion/efficiency trend
    Trends {
        /// Project id (omit for portfolio scope)
        #[arg(long)]
        project: Option<i64>,
        /// How many months to look back
        #[arg(long, default_value_t = edt_analyze::DEFAULT_MONTHS_BACK)]
        months: u32,
    },

    /// Per-category performance classification
    Performance {
        /// Project id (omit for portfolio scope)
        #[arg(long)]
        project: Option<i64>,
    },

    /// Overdue / due-soon / deviation / staleness alerts
    Alerts {
        /// Project id (omit for portfolio scope)
        #[arg(long)]
        project: Option<i64>,
    },

    /// Composed executive dashboard over the whole portfolio
    Dashboard,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let Some(snapshot_path) = cli.snapshot else {
        eprintln!("error: --snapshot <FILE> is required");
        process::exit(2);
    };
    let gateway = match load_snapshot(&snapshot_path) {
        Ok(gateway) => gateway,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    match cli.command {
        Commands::Validate { project_id, stage } => {
            rt.block_on(cmd_validate(&gateway, project_id, &stage));
        }
        Commands::Kpis {
            project,
            category,
            responsible,
            from,
            to,
        } => {
            let filter = WorkPackageFilter {
                category_id: category,
                responsible_id: responsible,
                date_from: from.as_deref().map(parse_date_or_exit),
                date_to: to.as_deref().map(parse_date_or_exit),
            };
            rt.block_on(cmd_kpis(&gateway, project, &filter));
        }
        Commands::Trends { project, months } => {
            rt.block_on(cmd_trends(&gateway, project, months));
        }
        Commands::Performance { project } => {
            rt.block_on(cmd_performance(&gateway, project));
        }
        Commands::Alerts { project } => {
            rt.block_on(cmd_alerts(&gateway, project));
        }
        Commands::Dashboard => {
            rt.block_on(cmd_dashboard(&gateway));
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("EDT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_snapshot(path: &Path) -> Result<InMemoryGateway, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading snapshot '{}': {}", path.display(), e))?;
    let data: SnapshotData = serde_json::from_str(&raw)
        .map_err(|e| format!("error parsing snapshot '{}': {}", path.display(), e))?;
    Ok(InMemoryGateway::new(data))
}

fn parse_date_or_exit(raw: &str) -> Date {
    let format = format_description!("[year]-[month]-[day]");
    match Date::parse(raw, &format) {
        Ok(date) => date,
        Err(err) => {
            eprintln!("error: invalid date '{}': {}", raw, err);
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(err) => {
            eprintln!("serialization error: {}", err);
            process::exit(1);
        }
    }
}

async fn cmd_validate(gateway: &InMemoryGateway, project_id: i64, stages: &[StageArg]) {
    let report = if stages.is_empty() {
        edt_core::run_full_validation(gateway, project_id).await
    } else {
        let stages: Vec<ValidationStage> = stages.iter().map(|&s| s.into()).collect();
        edt_core::run_stages(gateway, project_id, &stages).await
    };
    print_json(&report);
    if !report.is_valid {
        process::exit(1);
    }
}

async fn cmd_kpis(gateway: &InMemoryGateway, project: Option<i64>, filter: &WorkPackageFilter) {
    match edt_analyze::compute_kpis(gateway, project, filter).await {
        Ok(kpis) => print_json(&kpis),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

async fn cmd_trends(gateway: &InMemoryGateway, project: Option<i64>, months: u32) {
    match edt_analyze::monthly_trends(gateway, project, months).await {
        Ok(points) => print_json(&points),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

async fn cmd_performance(gateway: &InMemoryGateway, project: Option<i64>) {
    match edt_analyze::performance_by_category(gateway, project).await {
        Ok(rows) => print_json(&rows),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

async fn cmd_alerts(gateway: &InMemoryGateway, project: Option<i64>) {
    match edt_analyze::generate_alerts(gateway, project).await {
        Ok(alerts) => print_json(&alerts),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

async fn cmd_dashboard(gateway: &InMemoryGateway) {
    let report = edt_analyze::executive_dashboard(gateway).await;
    print_json(&report);
}
