//! Command-line argument parsing

use clap::{ Parser, ValueEnum };
use std::path::PathBuf;

/// Adds domains to a web application's source blocklist.
///
/// Domains come from `--file` and/or positional arguments. The anti-forgery token is either
/// given with `--token` or scraped from `--token-page` using the session cookie.
#[derive(Parser, Debug)]
#[command(name = "blockrs")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Domains to block, submitted after the ones from --file
    pub domains: Vec<String>,

    /// File with one domain per line (`#` starts a comment)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Root URL of the web application
    #[arg(long, env = "BLOCKRS_BASE_URL")]
    pub base_url: String,

    /// CSRF token; when absent it is read from --token-page
    #[arg(long, env = "BLOCKRS_CSRF_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Page whose `csrf-token` meta tag supplies the token
    #[arg(long, default_value = "/")]
    pub token_page: String,

    /// Cookie header of the logged-in browser session
    #[arg(long, env = "BLOCKRS_SESSION_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Submit with up to N requests in flight instead of one at a time
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Proxy for all requests
    #[arg(long)]
    pub proxy: Option<String>,

    /// User-Agent header to send
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}
