// Main entry point for the cardwatch watcher

use anyhow::{Context, Result};
use cardwatch_core::{
    CuEnumerator, CuParser, EnvConfig, Extractor, Messenger, TelegramSink, TracingSink, Watcher,
    WatcherConfig,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webdriver::WebDriverSession;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cardwatch_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cardwatch");

    let config = WatcherConfig::default();
    let env = EnvConfig::from_env();

    let session = WebDriverSession::connect(&env.webdriver_url)
        .await
        .context("Failed to open a WebDriver session")?;
    tracing::info!(server = %env.webdriver_url, "Browser session ready");

    let messenger = Messenger::new(vec![
        Box::new(TracingSink),
        Box::new(TelegramSink::new(env.telegram_token, env.telegram_channel)),
    ]);

    let enumerator = CuEnumerator::new(session.clone(), &config)
        .context("Failed to build the listing enumerator")?;
    let extractor = Extractor::new(enumerator, CuParser, config.whitelist.clone());

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received, shutting down");
                shutdown.cancel();
            }
        });
    }

    let watcher = Watcher::new(extractor, messenger, &config, shutdown);
    let run_result = watcher.run().await;

    // Release the browser whether the loop ended cleanly or not
    if let Err(error) = session.close().await {
        tracing::warn!(error = %error, "Failed to close the WebDriver session");
    }

    run_result.context("Watcher stopped on a fatal extraction error")?;
    tracing::info!("cardwatch stopped");
    Ok(())
}
