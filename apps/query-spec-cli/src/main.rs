use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use query_spec::{
    spec_error_to_problem, InMemoryRepository, QueryError, QueryService, Repository,
    SpecificationBuilder,
};
use query_spec_core::PaginationFilter;
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

mod catalog;

use catalog::Product;

/// Exit code for requests rejected at compile time.
const EXIT_INVALID_REQUEST: u8 = 2;

/// Query spec CLI - compile and run listing requests against a product catalog
#[derive(Parser)]
#[command(name = "query-spec-cli")]
#[command(about = "Compile and run listing requests against a product catalog")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Default page size (overrides config)
    #[arg(long)]
    page_size: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a request against a JSON array of products and print the page
    Run {
        /// Request JSON file
        #[arg(short, long)]
        request: PathBuf,
        /// Products JSON file
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Compile a request without running it
    Check {
        /// Request JSON file
        #[arg(short, long)]
        request: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let args = CliArgs {
        verbose: cli.verbose,
        page_size: cli.page_size,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    config.query.validate()?;

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, &config.base_dir()?);
    tracing::debug!(config = ?cli.config, "query-spec-cli starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    match cli.command {
        Some(Commands::Run { request, data }) => run(&config, &request, &data).await,
        Some(Commands::Check { request }) => check(&config, &request),
        None => {
            println!("{}", config.to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid {what} JSON in {}", path.display()))
}

fn print_problem(err: &query_spec::Error, request: &Path) -> Result<ExitCode> {
    let problem = spec_error_to_problem(err, &request.to_string_lossy());
    println!("{}", serde_json::to_string_pretty(&problem)?);
    Ok(ExitCode::from(EXIT_INVALID_REQUEST))
}

async fn run(config: &AppConfig, request_path: &Path, data_path: &Path) -> Result<ExitCode> {
    let request: PaginationFilter = read_json(request_path, "request")?;
    let products: Vec<Product> = read_json(data_path, "data")?;
    tracing::info!(products = products.len(), "loaded catalog");

    let repo: Arc<dyn Repository<Product>> = Arc::new(InMemoryRepository::new(products));
    let service = QueryService::new(repo, config.query.build_options());

    match service.list(&request).await {
        Ok(page) => {
            println!("{}", serde_json::to_string_pretty(&page)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(QueryError::Spec(err)) => {
            tracing::warn!(error = %err, "request rejected");
            print_problem(&err, request_path)
        }
        Err(err @ QueryError::Repository(_)) => Err(err.into()),
    }
}

fn check(config: &AppConfig, request_path: &Path) -> Result<ExitCode> {
    let request: PaginationFilter = read_json(request_path, "request")?;

    let compiled = SpecificationBuilder::from_pagination_filter(&request).and_then(|b| {
        b.with_options(config.query.build_options())
            .build::<Product>()
    });

    match compiled {
        Ok(spec) => {
            let summary = serde_json::json!({
                "status": "ok",
                "filtered": spec.predicate().is_some(),
                "ordered": spec.comparator().is_some(),
                "page": spec.page().map(|p| serde_json::json!({
                    "pageNumber": p.page_number,
                    "pageSize": p.page_size,
                    "skip": p.skip.unwrap_or(0),
                    "take": p.take,
                })),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => print_problem(&err, request_path),
    }
}
