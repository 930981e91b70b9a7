use anyhow::Result;
use clap::{Parser, Subcommand};
use sitegrade_runtime::cli::{self, audit_cmd::AuditArgs};
use sitegrade_runtime::config::CrawlConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sitegrade", version, about = "Crawl a website and grade its accessibility and usability")]
struct Cli {
    /// Machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,
    /// Only print results
    #[arg(long, short, global = true)]
    quiet: bool,
    /// Show every issue and info-level logs
    #[arg(long, short, global = true)]
    verbose: bool,
    #[arg(long, global = true)]
    no_color: bool,
    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl a live site and score it
    Audit {
        url: String,
        /// nielsen, krds-accessibility, krds-uiux, a comma list, or all
        #[arg(long, default_value = "all")]
        taxonomy: String,
        #[arg(long = "max-pages", default_value_t = 10)]
        max_pages: usize,
        /// Main-page timeout in milliseconds; sub-pages get half
        #[arg(long, default_value_t = 30_000)]
        timeout: u64,
        #[arg(long = "batch-size", default_value_t = 3)]
        batch_size: usize,
        /// Pause after load before reading markup, in milliseconds
        #[arg(long, default_value_t = 2_000)]
        settle: u64,
        /// CSS selector to wait for after navigation
        #[arg(long = "wait-for")]
        wait_for: Option<String>,
        #[arg(long = "user-agent")]
        user_agent: Option<String>,
        /// Fetch over plain HTTP instead of a headless browser
        #[arg(long)]
        http: bool,
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long)]
        corpus: Option<PathBuf>,
        #[arg(long)]
        calibration: Option<PathBuf>,
        /// Seed for prediction jitter
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score saved markup offline
    Score {
        file: PathBuf,
        /// URL the markup was saved from
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "all")]
        taxonomy: String,
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long)]
        calibration: Option<PathBuf>,
    },
    /// Predict a score from the most similar reference sites
    Predict {
        file: PathBuf,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        corpus: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Rule configuration tools
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// Validate a rule file and list its items
    Check { path: PathBuf },
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "sitegrade=info" } else { "sitegrade=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Output helpers read these
    if args.json {
        std::env::set_var("SITEGRADE_JSON", "1");
    }
    if args.quiet {
        std::env::set_var("SITEGRADE_QUIET", "1");
    }
    if args.verbose {
        std::env::set_var("SITEGRADE_VERBOSE", "1");
    }
    if args.no_color {
        std::env::set_var("SITEGRADE_NO_COLOR", "1");
    }
    init_tracing(args.verbose, args.log_json);

    match args.command {
        Command::Audit {
            url,
            taxonomy,
            max_pages,
            timeout,
            batch_size,
            settle,
            wait_for,
            user_agent,
            http,
            rules,
            corpus,
            calibration,
            seed,
        } => {
            let config = CrawlConfig {
                max_sub_pages: max_pages,
                timeout_ms: timeout,
                batch_size,
                settle_delay_ms: settle,
                wait_selector: wait_for,
                user_agent,
                ..Default::default()
            };
            cli::audit_cmd::run(AuditArgs {
                url,
                taxonomy,
                config,
                http,
                rules,
                corpus,
                calibration,
                seed,
            })
            .await
        }
        Command::Score {
            file,
            url,
            taxonomy,
            rules,
            calibration,
        } => cli::score_cmd::run(&file, &url, &taxonomy, rules, calibration),
        Command::Predict {
            file,
            url,
            corpus,
            seed,
        } => cli::predict_cmd::run(&file, url.as_deref(), corpus, seed),
        Command::Rules {
            action: RulesAction::Check { path },
        } => cli::rules_cmd::run(&path),
    }
}
