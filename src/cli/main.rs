// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * GQLms - GraphQL Mutation Authorization Tester
 * Standalone CLI that replays every mutation of a GraphQL endpoint with
 * stripped credentials and reports which ones the server still executes
 *
 * (c) 2026 Bountyy Oy
 */

mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gqlms::config::{self, ConfigValidator, ProbeConfig, DEFAULT_PROXY};
use gqlms::errors::ProbeError;
use gqlms::http_client::{HttpClient, HttpClientConfig};
use gqlms::orchestrator::{AutoConfirm, Confirm, MutationAuthTester, TesterConfig};
use gqlms::reporting::{JsonReportGenerator, ResultSinks};
use gqlms::request_file::CapturedRequest;

use prompt::StdinConfirm;

/// GQLms - GraphQL Mutation Authorization Tester
#[derive(Parser)]
#[command(name = "gqlms")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version)]
#[command(about = "Finds GraphQL mutations that execute without authorization", long_about = None)]
struct Cli {
    /// Captured HTTP request file (e.g. exported from Burp)
    #[arg(short = 'r', long = "request", value_name = "FILE")]
    request: PathBuf,

    /// Seconds to wait between mutations
    #[arg(short = 't', long = "delay", value_name = "SECS")]
    delay: Option<u64>,

    /// Resolve relative request targets with HTTPS (use --ssl false for HTTP)
    #[arg(long, value_name = "BOOL")]
    ssl: Option<bool>,

    /// Comma-separated headers to remove after introspection
    #[arg(long, value_delimiter = ',', value_name = "HEADERS")]
    unauth: Vec<String>,

    /// Route traffic through a proxy
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_PROXY, value_name = "URL")]
    proxy: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Directory for the result files
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long, value_name = "FILE")]
    json_report: Option<PathBuf>,

    /// Reuse input type introspection across mutations
    #[arg(long)]
    cache_input_types: bool,

    /// Continue without asking when unauth headers are missing
    #[arg(short = 'y', long)]
    yes: bool,

    /// Configuration file path (yaml, toml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every mutation response
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(async_main(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ProbeError>() {
            Some(ProbeError::Aborted { .. }) => {
                println!("Aborting.");
                ExitCode::SUCCESS
            }
            _ => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    for warning in ConfigValidator::warnings(&config) {
        warn!("{}", warning);
    }

    print_banner();

    let request = CapturedRequest::from_file(&cli.request, config.use_ssl)?;

    if request.headers.contains("Authorization") {
        println!(" -> Authenticated mode");
    } else {
        println!(" -> Unauthenticated mode");
    }
    match &config.proxy {
        Some(proxy) => println!(" -> Using proxy {}", proxy),
        None => println!(" -> No proxy in use"),
    }
    println!(" -> Target {}", request.endpoint);

    let client = HttpClient::with_config(&HttpClientConfig {
        timeout_secs: config.request_timeout_secs,
        proxy: config.proxy.clone(),
        accept_invalid_certs: config.accept_invalid_certs,
    })?;

    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(StdinConfirm)
    };

    let tester = MutationAuthTester::new(
        Arc::new(client),
        request.endpoint.clone(),
        TesterConfig {
            delay: config.delay(),
            unauth_headers: config.unauth_headers.clone(),
            cache_input_types: config.cache_input_types,
            max_input_depth: config.max_input_depth,
            log_responses: config.log_responses,
        },
    )
    .with_confirm(confirm);

    // Ask before the result files of a previous run are truncated
    tester.preflight(&request.headers)?;

    let output = &config.output;
    let mut sinks = ResultSinks::files(
        &output.directory,
        &output.all_mutations,
        &output.allowed_mutations,
        &output.unallowed_mutations,
    )
    .with_context(|| format!("Failed to create result files in {:?}", output.directory))?;

    let report = tester.execute(request.headers.clone(), &mut sinks).await?;

    println!();
    println!("Authorization testing completed!");
    println!();
    println!("{}", report.summary);

    if let Some(path) = &output.json_report {
        JsonReportGenerator::new().write_to(&report, path)?;
        info!("JSON report written to {:?}", path);
    }

    Ok(())
}

/// Defaults, config file and environment, then command line flags
fn resolve_config(cli: &Cli) -> Result<ProbeConfig> {
    let mut config = config::load_config(cli.config.as_deref())?;

    if let Some(delay) = cli.delay {
        config.delay_secs = delay;
    }
    if let Some(ssl) = cli.ssl {
        config.use_ssl = ssl;
    }

    let unauth: Vec<String> = cli
        .unauth
        .iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if !unauth.is_empty() {
        config.unauth_headers = unauth;
    }

    if let Some(proxy) = &cli.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(path) = &cli.json_report {
        config.output.json_report = Some(path.clone());
    }

    config.accept_invalid_certs |= cli.insecure;
    config.cache_input_types |= cli.cache_input_types;
    config.log_responses |= cli.verbose;

    ConfigValidator::validate(&config)?;
    Ok(config)
}

fn print_banner() {
    print!("\x1b[95m");
    println!("   ____  ___  _");
    println!("  / ___|/ _ \\| |    _ __ ___  ___");
    println!(" | |  _| | | | |   | '_ ` _ \\/ __|");
    println!(" | |_| | |_| | |___| | | | | \\__ \\");
    println!("  \\____|\\__\\_\\_____|_| |_| |_|___/");
    print!("\x1b[0m");
    println!();
    print!("\x1b[1m\x1b[97m");
    println!("    GraphQL mutation authorization tester");
    print!("\x1b[0m");
    println!("      v{} - (c) 2026 Bountyy Oy", env!("CARGO_PKG_VERSION"));
    println!();
}
