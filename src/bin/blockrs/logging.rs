//! Logging initialization

use tracing::Level;
use tracing_subscriber::{ fmt, prelude::*, EnvFilter };

use crate::args::{ Args, LogFormat };

/// Initialize logging based on CLI arguments; `RUST_LOG` overrides the level.
pub fn init(args: &Args) {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    match args.log_format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(args.verbose >= 2))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().json()).init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().compact()).init();
        }
    }
}
