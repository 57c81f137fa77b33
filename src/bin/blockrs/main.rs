//! blockrs CLI
//!
//! Submits a list of domains to the source blocklist of a logged-in web application.

mod args;
mod logging;

use anyhow::{ Context, Result };
use blockrs::{ CredentialProvider, DomainList, StaticToken, SubmitMode, SubmitterBuilder };
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(&args);

    ExitCode::from(exit_status(run(args).await))
}

/// 0 when every domain was acknowledged, 1 when any failed or the run aborted.
fn exit_status(result: Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            1
        }
    }
}

/// Returns whether every domain was acknowledged.
async fn run(args: Args) -> Result<bool> {
    let domains = load_domains(&args)?;

    let mode = match args.concurrency {
        Some(limit) => SubmitMode::Concurrent { limit },
        None => SubmitMode::Sequential,
    };

    let submitter = SubmitterBuilder::new()
        .base_url(args.base_url.clone())
        .timeout(args.timeout)
        .ssl_verify(!args.insecure)
        .proxy(args.proxy.clone())
        .session_cookie(args.cookie.clone())
        .user_agent(args.user_agent.clone())
        .mode(mode)
        .build()
        .context("Invalid submitter configuration")?;

    let credentials: Box<dyn CredentialProvider> = match &args.token {
        Some(token) => Box::new(StaticToken::new(token.clone())?),
        None => Box::new(submitter.meta_tag_provider(&args.token_page)?),
    };

    let outcomes = submitter
        .run(&domains, credentials.as_ref()).await
        .context("Could not obtain a CSRF token")?;

    Ok(outcomes.iter().all(|outcome| outcome.is_acknowledged()))
}

fn load_domains(args: &Args) -> Result<DomainList> {
    let positional = if args.domains.is_empty() {
        None
    } else {
        Some(DomainList::new(&args.domains)?)
    };

    match (&args.file, positional) {
        (Some(path), positional) => {
            let mut domains = DomainList::from_file(path)?;
            if let Some(extra) = positional {
                domains.extend(extra);
            }
            Ok(domains)
        }
        (None, Some(domains)) => Ok(domains),
        (None, None) => anyhow::bail!("No domains given; pass them as arguments or with --file"),
    }
}
