mod config;
mod dashboard;
pub mod parking_api;
mod poll_scheduler;
mod processors;

use tracing::{debug, info, warn};
use tracing_appender::rolling;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt};

use crate::config::Config;
use crate::dashboard::console_sink::ConsoleSink;
use crate::parking_api::parking_client::ParkingClient;
use crate::poll_scheduler::{PollScheduler, SchedulerHandle};
use std::io::BufRead;
use tokio::sync::mpsc;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load_or_create_example("config.toml")?;

    // Directory for logs
    let log_dir = &config.logging.directory;

    // One file per level
    let debug_file = rolling::daily(log_dir, &config.logging.debug_file);
    let info_file = rolling::daily(log_dir, &config.logging.info_file);
    let warn_file = rolling::daily(log_dir, &config.logging.warn_file);
    let error_file = rolling::daily(log_dir, &config.logging.error_file);

    let debug_layer = fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(EnvFilter::new("debug"));

    let info_layer = fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::INFO);

    let warn_layer = fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let error_layer = fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

    // Console goes to stderr so it doesn't interleave with the dashboard
    let console_layer = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(&config.logging.console_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(debug_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    let client = ParkingClient::new(&config.parking_api)?;
    info!("Monitoring {}", client.url());

    let (scheduler, join) = PollScheduler::new(
        client,
        ConsoleSink::default(),
        config.intervals.refresh_interval(),
    )
    .spawn(config.limits.command_channel_size);

    scheduler.start().await?;
    println!("Commands: [r]efresh, [p]ause, [c]ontinue, [q]uit");

    tokio::select! {
        result = read_commands(&scheduler) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    scheduler.stop().await?;
    join.await?;
    Ok(())
}

/// Maps stdin lines onto the scheduler lifecycle until `quit` or EOF.
async fn read_commands(scheduler: &SchedulerHandle) -> anyhow::Result<()> {
    let mut lines = spawn_stdin_reader();
    while let Some(line) = lines.recv().await {
        match line.trim() {
            "r" | "refresh" => scheduler.force_refresh().await?,
            "p" | "pause" => scheduler.suspend().await?,
            "c" | "resume" => scheduler.resume().await?,
            "q" | "quit" => return Ok(()),
            "" => {}
            other => warn!("Unknown command: {:?}", other),
        }
    }
    debug!("stdin closed");
    Ok(())
}

// A plain thread, so a pending read never holds up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
