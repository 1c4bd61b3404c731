//! Submits a sitemap crawl and waits for it on the main thread.

use std::time::Duration;
use ulfom_rust_sdk::prelude::*;

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let base_url = std::env::var("ULFOM_BASE_URL").unwrap_or_else(|_| "https://www.ulfom.com/api/v1".to_string());
    let client = BlockingClient::new(base_url)?;
    let tasks = BlockingTaskHelper::new(client);

    let task = tasks.create_task("sitemap_crawl", "https://example.com", None)?;
    println!("{}", task);

    match tasks.wait_for_task(
        "sitemap_crawl",
        &task.task_id,
        Some(Duration::from_millis(500)),
        Some(Duration::from_secs(60)),
    ) {
        Ok(status) => println!("Result: {}", status.result.unwrap_or(Value::Null)),
        Err(SdkError::TaskFailed { error, .. }) => eprintln!("Task failed: {}", error),
        Err(SdkError::TaskTimeout { timeout, .. }) => eprintln!("Task did not complete within {:?}", timeout),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
