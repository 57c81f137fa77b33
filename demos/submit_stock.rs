use blockrs::{ DomainList, SubmitterBuilder };
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let domains = DomainList::from_file("demos/stock_domains.txt")?;

    let submitter = SubmitterBuilder::new()
        .base_url(env::var("BLOCKRS_BASE_URL")?)
        .session_cookie(env::var("BLOCKRS_SESSION_COOKIE").ok())
        .timeout(10)
        .build()?;

    let credentials = submitter.meta_tag_provider("/")?;
    let outcomes = submitter.run(&domains, &credentials).await?;

    println!("Submitted {} domains:", domains.len());
    for (i, outcome) in outcomes.iter().enumerate() {
        println!("{}. {}", i + 1, serde_json::to_string(outcome)?);
    }

    Ok(())
}
