use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

use timewarden::clock::SystemClock;
use timewarden::reminder::ReminderDispatcher;
use timewarden::scheduler::{parse_cron, Scheduler};
use timewarden::{db, notify, AppConfig, AuthService, Clock};

/// How often expired one-time codes are swept from the store.
const OTP_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Never partial startup: list every problem and exit.
            for problem in &e.problems {
                tracing::error!("configuration: {problem}");
            }
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("starting timewarden");

    let db = db::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier = notify::build_notifier(&config)?;

    let auth = Arc::new(AuthService::new(
        db.clone(),
        Arc::clone(&notifier),
        Arc::clone(&clock),
        &config,
    ));

    let dispatcher = ReminderDispatcher::new(
        db.clone(),
        notifier,
        Arc::clone(&clock),
        config.scheduler_timezone,
    );

    let schedule = parse_cron(&config.scheduler_cron)?;
    let mut scheduler = Scheduler::new(dispatcher, schedule, config.scheduler_timezone, clock);

    // Reminders due while the process was down must not wait for the next
    // natural fire.
    scheduler.run_startup_catch_up().await;
    scheduler.start();

    let sweep = {
        let auth = Arc::clone(&auth);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(OTP_SWEEP_INTERVAL);
            tick.tick().await;
            loop {
                tick.tick().await;
                match auth.cleanup_expired().await {
                    Ok(0) => {}
                    Ok(count) => tracing::info!(count, "swept expired one-time codes"),
                    Err(e) => tracing::warn!(error = %e, "expired-code sweep failed"),
                }
            }
        })
    };

    tracing::info!("timewarden is ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    sweep.abort();
    scheduler.stop().await;

    tracing::info!("timewarden shut down");
    Ok(())
}
