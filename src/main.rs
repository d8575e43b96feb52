//! llm-dispatch - billed LLM business requests from the command line

#![allow(missing_docs)]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use llm_dispatch::core::examine::{ExamineInput, ReferenceAnswer};
use llm_dispatch::services::InMemoryCreditLedger;
use llm_dispatch::storage::Storage;
use llm_dispatch::utils::init_tracing;
use llm_dispatch::{AiModule, Config, RequestContext};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Parser)]
#[command(name = "llm-dispatch")]
#[command(about = "Dispatch billed LLM business requests")]
#[command(version = LONG_VERSION)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "LLM_DISPATCH_CONFIG", default_value = "config/dispatch.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations and seed the business configurations
    Migrate,

    /// Examine one answer against a reference answer
    Examine {
        /// Caller id
        #[arg(long)]
        uid: i64,

        /// Correlation id; defaults to a fresh id
        #[arg(long)]
        tid: Option<String>,

        /// Question title
        #[arg(long)]
        title: String,

        /// File holding the candidate's answer
        #[arg(long)]
        answer_file: PathBuf,

        /// YAML or JSON file with `basic`, `intermediate` and `advanced` sections
        #[arg(long)]
        reference_file: PathBuf,

        /// Credit granted to the caller before the request
        #[arg(long, default_value = "100000")]
        balance: i64,

        /// Abort the request after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_file(&cli.config)
        .await
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_tracing(&config.logging)?;

    match cli.command {
        Commands::Migrate => migrate(&config).await,
        Commands::Examine {
            uid,
            tid,
            title,
            answer_file,
            reference_file,
            balance,
            timeout_secs,
        } => {
            let input = ExamineInput::new(
                title,
                read_file(&answer_file).await?,
                read_reference(&reference_file).await?,
            );
            let tid = tid.unwrap_or_else(llm_dispatch::utils::generate_request_id);
            examine(&config, uid, tid, input, balance, timeout_secs).await
        }
    }
}

async fn migrate(config: &Config) -> Result<()> {
    if !config.storage.database.enabled {
        bail!("database is disabled; set storage.database.enabled or DATABASE_URL");
    }

    let storage = Storage::connect(config).await?;
    if let Some(db) = &storage.database {
        db.health_check().await?;
    }
    info!(businesses = config.businesses.len(), "migrations applied");
    println!(
        "Migrations applied, {} business configuration(s) seeded",
        config.businesses.len()
    );
    Ok(())
}

async fn examine(
    config: &Config,
    uid: i64,
    tid: String,
    input: ExamineInput,
    balance: i64,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let storage = Storage::connect(config).await?;
    let ledger = Arc::new(InMemoryCreditLedger::new());
    ledger.grant(uid, balance);

    let module = AiModule::init(config, storage, ledger.clone())?;

    let mut ctx = RequestContext::new();
    if let Some(secs) = timeout_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    let result = module.examine.examine(&ctx, uid, tid, input).await?;
    info!(
        tier = %result.tier,
        amount = result.amount,
        remaining = ledger.balance_of(uid),
        "examine completed"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

async fn read_reference(path: &Path) -> Result<ReferenceAnswer> {
    let content = read_file(path).await?;
    serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
