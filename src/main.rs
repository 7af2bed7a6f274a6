use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use attendance_engine::api::{AppState, create_router};
use attendance_engine::config::ConfigLoader;
use attendance_engine::engine::PunchProcessor;
use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding engine.yaml, employees.yaml and overtime_approvals.yaml
    #[arg(long, default_value = "./config/default")]
    config: PathBuf,

    /// Address to listen on, overriding engine.yaml
    #[arg(long)]
    listen: Option<String>,

    /// Do not run the nightly defaulter sweep
    #[arg(long)]
    no_sweep: bool,
}

/// Next occurrence of `end_of_day` strictly after `now`.
fn next_cutoff(now: NaiveDateTime, end_of_day: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(end_of_day);
    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

/// Sleeps until each day's cutoff and sweeps the whole roster.
async fn run_nightly_sweep(processor: Arc<PunchProcessor>, cancel: Arc<AtomicBool>) {
    let end_of_day = processor.settings().end_of_day;
    loop {
        let now = Local::now().naive_local();
        let cutoff = next_cutoff(now, end_of_day);
        let wait = (cutoff - now).to_std().unwrap_or_default();
        info!(cutoff = %cutoff, "Next defaulter sweep scheduled");
        tokio::time::sleep(wait).await;

        if cancel.load(Ordering::SeqCst) {
            break;
        }

        let processor = Arc::clone(&processor);
        let flag = Arc::clone(&cancel);
        let result =
            tokio::task::spawn_blocking(move || processor.sweep().sweep_all(cutoff, &flag)).await;
        match result {
            Ok(Ok(report)) if !report.is_clean() => {
                warn!(failed = report.failures.len(), "Defaulter sweep left failures");
            }
            Ok(Ok(_)) => {}
            Ok(Err(err)) => error!(error = %err, "Defaulter sweep could not list the roster"),
            Err(err) => error!(error = %err, "Defaulter sweep task failed"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let config = ConfigLoader::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let listen_addr = args
        .listen
        .clone()
        .unwrap_or_else(|| config.settings().listen_addr.clone());
    info!(
        employees = config.config().employees().len(),
        tolerance_minutes = config.settings().tolerance_minutes,
        end_of_day = %config.settings().end_of_day,
        "Configuration loaded"
    );

    let state = AppState::new(config);
    let cancel = Arc::new(AtomicBool::new(false));
    if !args.no_sweep {
        tokio::spawn(run_nightly_sweep(state.processor(), Arc::clone(&cancel)));
    }

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("binding {listen_addr}"))?;
    info!(addr = %listen_addr, "Attendance API listening");

    let shutdown_flag = Arc::clone(&cancel);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(?err, "failed to listen for shutdown signal");
            }
            shutdown_flag.store(true, Ordering::SeqCst);
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
