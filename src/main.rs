use followsweep::cli::{AppConfig, Args};
use followsweep::config::UserConfig;
use followsweep::console::{Console, StdConsole};
use followsweep::{ApiClient, AuthFlow, ReviewLoop, ReviewStatistics, SignatureEngine, SweepError};

use reqwest::Client;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse_args();
    init_tracing(args.log_filter());

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let user_config = match UserConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match AppConfig::resolve(&args, &user_config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let mut console = StdConsole::new(color);

    match run(&config, &mut console).await {
        Ok(stats) => {
            print_summary(&stats, config.dry_run);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Sweep aborted");
            eprintln!("Error: {}", e);
            let codes = e.api_error_codes();
            if !codes.is_empty() {
                eprintln!("Platform error codes: {:?}", codes);
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never interleave with prompts
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Authenticate, then review the follower page
async fn run(config: &AppConfig, console: &mut StdConsole) -> Result<ReviewStatistics, SweepError> {
    let http = Client::builder()
        .timeout(config.timeout)
        .user_agent(format!("followsweep/{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    let signer = SignatureEngine::new(config.consumer.clone());

    let grant = AuthFlow::new(http.clone(), &config.api_url, signer.clone())
        .authenticate(console)
        .await?;

    console.println(&format!("Reviewing followers of @{}", grant.screen_name))?;
    if config.dry_run {
        console.println("[DRY RUN] No follower will be blocked")?;
    }

    let client = ApiClient::new(http, &config.api_url, signer);
    ReviewLoop::new(&client, &grant, config.review_options())
        .run(console)
        .await
}

fn print_summary(stats: &ReviewStatistics, dry_run: bool) {
    if dry_run {
        println!("\n[DRY RUN] Complete");
        println!("   Would have kept: {} followers", stats.kept);
        println!("   Would have removed: {} followers", stats.removed);
    } else {
        println!("\nDone");
        println!("   Kept: {} followers", stats.kept);
        println!("   Removed: {} followers", stats.removed);
    }
    println!(
        "   Reviewed {} of {} fetched ({} mutual followers skipped)",
        stats.reviewed, stats.fetched, stats.mutuals_skipped
    );
}
