mod data;

use anyhow::Context;
use camino::Utf8PathBuf;
use chrono::Utc;
use claimfix_core::{
    ApplyLocks, Deps, DeliveryOutcome, InMemoryStore, download_export, resolve_export, run_apply,
    run_estimate, run_export, run_preview, run_scrub, run_workqueue,
};
use clap::{Parser, Subcommand};
use data::DataDir;
use std::io::Write;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(
    name = "claimfix",
    version,
    about = "Claim scrubbing, autofix, estimation, and EDI export tracking."
)]
struct Cli {
    /// Data directory holding the JSON fixture files.
    #[arg(long, default_value = ".")]
    data_dir: Utf8PathBuf,

    /// Rule tables file (default: <data_dir>/tables.json, else built-ins).
    #[arg(long)]
    tables: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a claim and print its findings.
    Scrub(ClaimArgs),
    /// Propose fixes (default: preview). With --apply, persist the result.
    Autofix(AutofixArgs),
    /// Estimate patient-owed cost from the latest eligibility snapshot.
    Estimate(ClaimArgs),
    /// Generate and queue a new 837P export file.
    Export(ClaimArgs),
    /// Record a delivery result for a queued export.
    Resolve(ResolveArgs),
    /// Print the file body of a SENT export.
    Download(ExportArgs),
    /// List claims with open findings.
    Workqueue,
}

#[derive(Debug, Parser)]
struct ClaimArgs {
    /// Claim id.
    #[arg(long)]
    claim: i64,
}

#[derive(Debug, Parser)]
struct AutofixArgs {
    /// Claim id.
    #[arg(long)]
    claim: i64,

    /// Persist the fixed claim instead of previewing.
    #[arg(long, default_value_t = false)]
    apply: bool,
}

#[derive(Debug, Parser)]
struct ResolveArgs {
    /// Export record id.
    #[arg(long)]
    export: Uuid,

    /// Delivery result.
    #[arg(long, value_enum)]
    outcome: OutcomeArg,
}

#[derive(Debug, Parser)]
struct ExportArgs {
    /// Export record id.
    #[arg(long)]
    export: Uuid,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutcomeArg {
    Sent,
    Failed,
}

impl From<OutcomeArg> for DeliveryOutcome {
    fn from(value: OutcomeArg) -> Self {
        match value {
            OutcomeArg::Sent => DeliveryOutcome::Acknowledged,
            OutcomeArg::Failed => DeliveryOutcome::Failed,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        eprintln!("error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data = DataDir::new(cli.data_dir.clone());
    let tables = data.rule_tables(cli.tables.as_deref())?;
    let store = data.load_store().context("load data directory")?;

    let deps = Deps {
        claims: &store,
        patients: &store,
        coverages: &store,
        eligibility: &store,
        exports: &store,
        tables: &tables,
    };

    match cli.cmd {
        Command::Scrub(args) => {
            let findings = run_scrub(&deps, args.claim)?;
            print_json(&findings)
        }
        Command::Autofix(args) => cmd_autofix(&deps, &data, &store, args),
        Command::Estimate(args) => {
            let outcome = run_estimate(&deps, args.claim)?;
            print_json(&outcome)
        }
        Command::Export(args) => {
            let record = run_export(&deps, &data.exports_dir(), args.claim, Utc::now())?;
            data.save_exports(&store)?;
            print_json(&record)
        }
        Command::Resolve(args) => {
            let record = resolve_export(&deps, args.export, args.outcome.into())?;
            data.save_exports(&store)?;
            print_json(&record)
        }
        Command::Download(args) => {
            let bytes = download_export(&deps, args.export)?;
            std::io::stdout().write_all(&bytes).context("write stdout")?;
            Ok(())
        }
        Command::Workqueue => {
            let rows = run_workqueue(&deps)?;
            print_json(&rows)
        }
    }
}

fn cmd_autofix(
    deps: &Deps<'_>,
    data: &DataDir,
    store: &InMemoryStore,
    args: AutofixArgs,
) -> anyhow::Result<()> {
    let outcome = if args.apply {
        let locks = ApplyLocks::new();
        let outcome = run_apply(deps, &locks, args.claim)?;
        data.save_claims(store)?;
        outcome
    } else {
        run_preview(deps, args.claim)?
    };
    print_json(&outcome)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}
