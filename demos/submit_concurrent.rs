use blockrs::{ DomainList, StaticToken, SubmitMode, SubmitterBuilder };
use std::env;
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let start_time = Instant::now();

    let domains = DomainList::new(["biztoc.com", "benzinga.com", "msn.com", "zacks.com"])?;
    let credentials = StaticToken::new(env::var("BLOCKRS_CSRF_TOKEN")?)?;

    let submitter = SubmitterBuilder::new()
        .base_url(env::var("BLOCKRS_BASE_URL")?)
        .session_cookie(env::var("BLOCKRS_SESSION_COOKIE").ok())
        .mode(SubmitMode::Concurrent { limit: 4 })
        .build()?;

    let outcomes = submitter.run(&domains, &credentials).await?;
    println!("Finished in {:.2?}", start_time.elapsed());

    for outcome in &outcomes {
        println!("{:>6}  {}", if outcome.is_acknowledged() { "ok" } else { "FAILED" }, outcome.domain());
    }

    Ok(())
}
