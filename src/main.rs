use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metra_notify::calendar::CalendarClient;
use metra_notify::client::MetraClient;
use metra_notify::config::Config;
use metra_notify::once;
use metra_notify::slack::SlackNotifier;
use metra_notify::watch::{self, WatchOptions};

#[derive(Debug, Parser)]
#[command(name = "metra-notify", about = "Posts Metra delay notices to Slack")]
struct Cli {
    /// Credentials file (Metra API, Slack hook, calendar id and key).
    #[arg(long, default_value = "credentials.json")]
    credentials: PathBuf,
    /// Local stop-times cache file.
    #[arg(long, default_value = "stop_times.json")]
    stop_times: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate the calendar of favorited trips once (for a cron trigger).
    Once,
    /// Poll a favorites file on a fixed interval.
    Watch {
        /// JSON array of {stop_id, stop_time, trip_id, direction}.
        favorites: PathBuf,
        /// Repeat passes after the initial one.
        #[arg(long, default_value_t = 12)]
        iterations: u32,
        /// Seconds to sleep between passes.
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metra_notify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = usage_exit_code(&err);
            let _ = err.print();
            std::process::exit(code);
        }
    };
    let config = Config::load(&cli.credentials)
        .with_context(|| format!("failed to load credentials from {}", cli.credentials.display()))?;
    let api = MetraClient::new(&config);
    let notifier = SlackNotifier::new(&config);

    match cli.command {
        Command::Once => {
            let calendar = CalendarClient::new(&config);
            once::run(&api, &calendar, &notifier, &cli.stop_times, config.timezone).await?;
        }
        Command::Watch {
            favorites,
            iterations,
            interval_secs,
        } => {
            if !favorites.is_file() {
                error!(path = %favorites.display(), "favorites file does not exist");
                std::process::exit(2);
            }
            let list = watch::load_favorites(&favorites)
                .with_context(|| format!("failed to read favorites from {}", favorites.display()))?;
            let options = WatchOptions {
                iterations,
                interval: Duration::from_secs(interval_secs),
            };
            watch::run(&api, &notifier, &list, &options, config.timezone).await?;
        }
    }
    Ok(())
}

/// Bad invocations exit 1; `--help` and `--version` exit 0. Exit 2 stays
/// reserved for a favorites path that does not point at a file.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}
