// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::oauth::Credentials;
use crate::review::{ReviewOptions, DEFAULT_REMOVAL_DELAY};
use clap::{ArgAction, Parser};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

/// Followsweep - review your followers and quietly remove the spam
///
/// Each follower you do not follow back is scored against a few bot
/// heuristics and shown with a suggested answer. Removing a follower blocks
/// and then unblocks them, which drops the follow without a lasting block.
#[derive(Parser, Debug, Clone)]
#[command(name = "followsweep")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// OAuth consumer (API) key
    #[arg(long, env = "TWITTER_CONSUMER_KEY", hide_env_values = true)]
    pub consumer_key: Option<String>,

    /// OAuth consumer (API) secret
    #[arg(long, env = "TWITTER_CONSUMER_SECRET", hide_env_values = true)]
    pub consumer_secret: Option<String>,

    /// Base URL of the platform API
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Pause between block and unblock when removing a follower, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REMOVAL_DELAY.as_millis() as u64)]
    pub removal_delay_ms: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Dry run mode - ask about every follower but never block anyone
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.api_url)
            .map_err(|e| format!("Invalid api-url '{}': {}", self.api_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "Invalid api-url '{}': expected an http(s) URL",
                self.api_url
            ));
        }

        if self.timeout_secs == 0 {
            return Err("timeout-secs must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Default tracing filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Configuration resolved from arguments, environment and config file
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub consumer: Credentials,
    pub api_url: String,
    pub removal_delay: Duration,
    pub timeout: Duration,
    pub dry_run: bool,
}

impl AppConfig {
    /// Merge arguments over the config file. Missing consumer credentials are fatal.
    pub fn resolve(args: &Args, user_config: &UserConfig) -> Result<Self, String> {
        let key = pick(&args.consumer_key, &user_config.consumer_key).ok_or_else(|| {
            "Missing consumer key: pass --consumer-key or set TWITTER_CONSUMER_KEY".to_string()
        })?;
        let secret = pick(&args.consumer_secret, &user_config.consumer_secret).ok_or_else(|| {
            "Missing consumer secret: pass --consumer-secret or set TWITTER_CONSUMER_SECRET"
                .to_string()
        })?;

        Ok(AppConfig {
            consumer: Credentials::new(key, secret),
            api_url: args.api_url.clone(),
            removal_delay: Duration::from_millis(args.removal_delay_ms),
            timeout: Duration::from_secs(args.timeout_secs),
            dry_run: args.dry_run,
        })
    }

    pub fn review_options(&self) -> ReviewOptions {
        ReviewOptions {
            removal_delay: self.removal_delay,
            dry_run: self.dry_run,
        }
    }
}

fn pick(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
    primary
        .iter()
        .chain(fallback.iter())
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
