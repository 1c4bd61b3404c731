//! Submits a sitemap crawl and waits for it on a tokio runtime.
//! Press Ctrl-C to stop waiting.

use std::time::Duration;
use ulfom_rust_sdk::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let base_url = std::env::var("ULFOM_BASE_URL").unwrap_or_else(|_| "https://www.ulfom.com/api/v1".to_string());
    let mut config = ClientConfig::new(base_url);
    if let Ok(key) = std::env::var("ULFOM_API_KEY") {
        config = config.with_api_key(key);
    }

    let client = Client::with_config(config)?;
    let catalog = CatalogHelper::new(client.clone());
    println!("Task services: {}", catalog.list_task_services().await?);

    let tasks = TaskHelper::new(client)
        .with_poll_config(PollConfig::new(Duration::from_secs(1), Some(Duration::from_secs(120)))?);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let waited = tasks
        .create_and_wait_cancellable(
            "sitemap_crawl",
            "https://example.com",
            Some(json!({"max_pages": 50})),
            None,
            None,
            &cancel,
        )
        .await;

    match TaskOutcome::from_result(waited)? {
        TaskOutcome::Completed(status) => println!("Result: {}", status.result.unwrap_or(Value::Null)),
        TaskOutcome::Failed { error, .. } => eprintln!("Task failed: {}", error),
        TaskOutcome::TimedOut { elapsed, .. } => eprintln!("Task still running after {:?}", elapsed),
        TaskOutcome::Cancelled { .. } => eprintln!("Stopped waiting"),
    }

    Ok(())
}
