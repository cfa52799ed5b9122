use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use common::{
    aging::{AgingJob, DEFAULT_SIGNATURE},
    notify::LogNotifier,
    scheduler::Scheduler,
    store::{JsonFileStore, Records},
};
use tokio::signal::ctrl_c;
use tracing::info;

/// Ages medicine stock outside the record service. Only run this against a
/// store whose service has AGING_ENABLED=false, the two processes do not
/// coordinate their writes.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Customer document to age
    #[clap(long, env = "STORE_PATH", default_value = "users.json")]
    store_path: PathBuf,

    /// Seconds between runs
    #[clap(long, env = "AGING_INTERVAL_SECS", default_value_t = 12 * 60 * 60)]
    interval_secs: u64,

    #[clap(long, env = "REMINDER_SIGNATURE", default_value = DEFAULT_SIGNATURE)]
    signature: String,

    /// Run a single pass and exit, for cron
    #[clap(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    anyhow::ensure!(cli.interval_secs > 0, "interval must be positive");

    info!("Starting the aging worker on {}", cli.store_path.display());
    let records = Arc::new(Records::new(JsonFileStore::new(&cli.store_path)));
    let job = Arc::new(AgingJob::new(records, Arc::new(LogNotifier), cli.signature));

    if cli.once {
        let report = job
            .tick()
            .await
            .ok_or_else(|| anyhow::anyhow!("aging pass failed, see log"))?;
        info!(
            "Aged {} medicine(s), {} reminder(s)",
            report.decremented,
            report.reminders.len()
        );
        return Ok(());
    }

    let handle = Scheduler::spawn(
        "medicine aging",
        Duration::from_secs(cli.interval_secs),
        move || {
            let job = job.clone();
            async move {
                job.tick().await;
            }
        },
    );

    ctrl_c().await?;
    info!("Received Ctrl+C, shutting down");
    handle.cancel().await;

    Ok(())
}
