// src/main.rs
mod edgar;
mod extractors;
mod reports;
mod storage;
mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use edgar::client::EdgarClientConfig;
use edgar::memory::LOCAL_CIK;
use edgar::{EdgarClient, FilingStore, MemoryFilingStore};
use reports::{ExtractionRequest, FilingSearchRequest, DEFAULT_FORM_TYPE};
use storage::StorageManager;
use utils::AppError;

/// Extracts business, risk-factor and MD&A signal from SEC filings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to save JSON reports into (reports are always printed to stdout)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Analyze local filing documents instead of fetching from EDGAR.
    /// Each file is a filing under CIK "local", keyed by its file stem.
    #[arg(short, long, global = true)]
    input: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Which filing to analyze
#[derive(clap::Args, Debug, Clone)]
struct FilingArgs {
    /// Company CIK or ticker symbol
    #[arg(short, long, default_value = LOCAL_CIK)]
    cik: String,

    /// Specific SEC accession number (defaults to the latest filing of --form-type)
    #[arg(short, long)]
    accession_number: Option<String>,

    /// Form type to look for
    #[arg(short, long, default_value = DEFAULT_FORM_TYPE)]
    form_type: String,
}

impl From<FilingArgs> for ExtractionRequest {
    fn from(args: FilingArgs) -> Self {
        ExtractionRequest {
            accession_number: args.accession_number,
            form_type: args.form_type,
            ..ExtractionRequest::latest(args.cik)
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a company by ticker or CIK
    Company {
        query: String,
    },
    /// List filings, optionally filtered by form, date range and text content
    Search {
        /// Company CIK or ticker symbol
        company: String,
        #[arg(short, long)]
        form_type: Option<String>,
        /// Earliest filing date (YYYY-MM-DD)
        #[arg(long)]
        date_from: Option<String>,
        /// Latest filing date (YYYY-MM-DD)
        #[arg(long)]
        date_to: Option<String>,
        /// Only keep filings whose text contains this phrase (downloads each filing)
        #[arg(long)]
        content: Option<String>,
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Extract the business description (Item 1)
    Business(FilingArgs),
    /// Extract and classify risk factors (Item 1A)
    RiskFactors(FilingArgs),
    /// Extract MD&A (Item 7) and its highlights
    Mda(FilingArgs),
    /// Compare business and risk sections of two filings
    Compare {
        /// Company CIK or ticker symbol
        #[arg(short, long, default_value = LOCAL_CIK)]
        cik: String,
        /// Accession number of the earlier filing
        filing1: String,
        /// Accession number of the later filing
        filing2: String,
    },
}

fn emit<T: Serialize>(
    storage: Option<&StorageManager>,
    kind: &str,
    cik: &str,
    accession_number: &str,
    report: &T,
) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(report)?);
    if let Some(storage) = storage {
        storage.save_report(kind, cik, accession_number, report)?;
    }
    Ok(())
}

/// Form type local `--input` files are tagged with, taken from the command.
fn local_form_type(command: &Command) -> String {
    match command {
        Command::Business(f) | Command::RiskFactors(f) | Command::Mda(f) => f.form_type.clone(),
        Command::Search { form_type: Some(form), .. } => form.clone(),
        _ => DEFAULT_FORM_TYPE.to_string(),
    }
}

async fn run<S: FilingStore>(
    store: &S,
    command: Command,
    storage: Option<&StorageManager>,
) -> Result<(), AppError> {
    match command {
        Command::Company { query } => {
            let report = reports::search_company(store, &query).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Search {
            company,
            form_type,
            date_from,
            date_to,
            content,
            limit,
        } => {
            if limit == 0 {
                return Err(AppError::Config("--limit must be at least 1".to_string()));
            }
            let request = FilingSearchRequest {
                company,
                form_type,
                date_from,
                date_to,
                content_search: content,
                limit,
            };
            let report = reports::search_filings(store, request).await?;
            tracing::info!("Search matched {} filings", report.total_found);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Business(args) => {
            let report = reports::fetch_business_report(store, &args.into()).await?;
            emit(storage, "business", &report.cik, &report.accession_number, &report)?;
        }
        Command::RiskFactors(args) => {
            let report = reports::fetch_risk_factors_report(store, &args.into()).await?;
            emit(storage, "risk_factors", &report.cik, &report.accession_number, &report)?;
        }
        Command::Mda(args) => {
            let report = reports::fetch_mda_report(store, &args.into()).await?;
            emit(storage, "mda", &report.cik, &report.accession_number, &report)?;
        }
        Command::Compare { cik, filing1, filing2 } => {
            let report = reports::fetch_comparison_report(store, &cik, &filing1, &filing2).await?;
            let key = format!("{}_vs_{}", report.filing1, report.filing2);
            emit(storage, "comparison", &report.cik, &key, &report)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Initialize storage if requested
    let storage = args.output_dir.as_ref().map(StorageManager::new).transpose()?;

    // 4. Pick the filing store and run the command
    if args.input.is_empty() {
        let client = EdgarClient::new(EdgarClientConfig::from_env())?;
        run(&client, args.command, storage.as_ref()).await
    } else {
        let store = MemoryFilingStore::from_files(&args.input, &local_form_type(&args.command))?;
        for filing in store.filings() {
            tracing::debug!("Local filing {} ({})", filing.accession_number(), filing.form_type());
        }
        run(&store, args.command, storage.as_ref()).await
    }
}
