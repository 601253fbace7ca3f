use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use contractor_ledger::application::reports::DateRange;
use contractor_ledger::application::service::LedgerService;
use contractor_ledger::config::AppConfig;
use contractor_ledger::domain::ports::LedgerStoreBox;
use contractor_ledger::domain::{ContractId, ProfileId};
use contractor_ledger::infrastructure::in_memory::InMemoryLedgerStore;
#[cfg(feature = "storage-rocksdb")]
use contractor_ledger::infrastructure::rocksdb::RocksDBStore;
use contractor_ledger::interfaces::csv::profile_writer::ProfileWriter;
use contractor_ledger::interfaces::csv::request_reader::RequestReader;
use contractor_ledger::interfaces::reply::ApiReply;
use contractor_ledger::interfaces::seed::load_snapshot;
use contractor_ledger::logger::init_logger;
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// JSON ledger seed loaded before the command runs
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay pay/deposit requests from a CSV file, then print balances
    Process {
        /// Requests CSV file (op, profile, target, amount)
        input: PathBuf,
    },
    /// Print profile balances
    Balances,
    /// Run a read-only report and print the reply as JSON
    Report {
        #[command(subcommand)]
        report: Report,
    },
}

#[derive(Subcommand)]
enum Report {
    /// A contract the profile is party to
    Contract {
        #[arg(long)]
        profile: ProfileId,
        id: ContractId,
    },
    /// The profile's non-terminated contracts
    Contracts {
        #[arg(long)]
        profile: ProfileId,
    },
    /// Unpaid jobs of the profile's in-progress contracts
    UnpaidJobs {
        #[arg(long)]
        profile: ProfileId,
    },
    /// Profession that earned the most in a date range
    BestProfession {
        #[arg(long, value_parser = parse_start)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_end)]
        end: DateTime<Utc>,
    },
    /// Clients that paid the most in a date range
    BestClients {
        #[arg(long, value_parser = parse_start)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_end)]
        end: DateTime<Utc>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn parse_start(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_date(s, NaiveTime::from_hms_opt(0, 0, 0))
}

fn parse_end(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_date(s, NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999))
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
fn parse_date(s: &str, time: Option<NaiveTime>) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", s, e))?;
    let time = time.ok_or_else(|| "invalid time of day".to_string())?;
    Ok(date.and_time(time).and_utc())
}

fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            tracing::debug!(path = %path.display(), "Opening RocksDB ledger");
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
            );
            Ok(Box::new(InMemoryLedgerStore::new()))
        }
        None => Ok(Box::new(InMemoryLedgerStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path).into_diagnostic()?,
        None => AppConfig::default(),
    };

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init_logger(level, config.logging.format);

    let store = open_store(cli.db_path.or(config.storage.db_path))?;
    let service =
        LedgerService::new(store).with_best_clients_limit(config.reports.best_clients_limit);

    if let Some(path) = &cli.ledger {
        let snapshot = load_snapshot(path).into_diagnostic()?;
        service.seed(snapshot).await.into_diagnostic()?;
    }

    match cli.command {
        Command::Process { input } => {
            let file = File::open(input).into_diagnostic()?;
            for request in RequestReader::new(file).requests() {
                match request {
                    Ok(request) => {
                        let (op, target) = (request.op, request.target);
                        let reply = request.dispatch(&service).await;
                        tracing::info!(
                            op = ?op,
                            target,
                            status = reply.status,
                            body = %reply.body,
                            "Request handled"
                        );
                    }
                    Err(e) => tracing::warn!("Error reading request: {}", e),
                }
            }
            write_balances(&service).await
        }
        Command::Balances => write_balances(&service).await,
        Command::Report { report } => {
            let reply = run_report(&service, report).await;
            println!("{}", serde_json::to_string_pretty(&reply).into_diagnostic()?);
            if reply.is_success() {
                Ok(())
            } else {
                Err(miette!("report failed with status {}", reply.status))
            }
        }
    }
}

async fn run_report(service: &LedgerService, report: Report) -> ApiReply {
    match report {
        Report::Contract { profile, id } => match service.resolve_caller(profile).await {
            Ok(caller) => ApiReply::from_result(service.contract(&caller, id).await),
            Err(e) => ApiReply::from_error(&e),
        },
        Report::Contracts { profile } => match service.resolve_caller(profile).await {
            Ok(caller) => ApiReply::from_result(service.contracts(&caller).await),
            Err(e) => ApiReply::from_error(&e),
        },
        Report::UnpaidJobs { profile } => match service.resolve_caller(profile).await {
            Ok(caller) => ApiReply::from_result(service.unpaid_jobs(&caller).await),
            Err(e) => ApiReply::from_error(&e),
        },
        Report::BestProfession { start, end } => match DateRange::new(start, end) {
            Ok(range) => ApiReply::from_result(service.best_profession(range).await),
            Err(e) => ApiReply::from_error(&e),
        },
        Report::BestClients { start, end, limit } => match DateRange::new(start, end) {
            Ok(range) => ApiReply::from_result(service.best_clients(range, limit).await),
            Err(e) => ApiReply::from_error(&e),
        },
    }
}

async fn write_balances(service: &LedgerService) -> Result<()> {
    let profiles = service.profiles().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ProfileWriter::new(stdout.lock());
    writer.write_profiles(profiles).into_diagnostic()?;
    Ok(())
}
