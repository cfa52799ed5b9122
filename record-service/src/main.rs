use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use common::{
    aging::AgingJob,
    notify::LogNotifier,
    scheduler::Scheduler,
    store::{JsonFileStore, Records},
};
use record_service::{config::Config, routes, security::configure_cors, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("Starting the record service");

    let store = JsonFileStore::new(&config.store_path);
    store.ensure_exists().await?;
    let records = Arc::new(Records::new(store));

    let aging = if config.aging_enabled {
        let job = Arc::new(AgingJob::new(
            records.clone(),
            Arc::new(LogNotifier),
            config.reminder_signature.clone(),
        ));
        Some(Scheduler::spawn(
            "medicine aging",
            config.aging_interval,
            move || {
                let job = job.clone();
                async move {
                    job.tick().await;
                }
            },
        ))
    } else {
        info!("Medicine aging disabled, run aging-worker instead");
        None
    };

    let app_state = web::Data::new(AppState { records });
    let allowed_origins = config.allowed_origins.clone();

    info!("Server is operational and listening on {}", config.server_address());
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .wrap(configure_cors(&allowed_origins))
            .configure(routes::configure)
    })
    .bind(config.server_address())?
    .run()
    .await?;

    if let Some(handle) = aging {
        handle.cancel().await;
    }

    Ok(())
}
