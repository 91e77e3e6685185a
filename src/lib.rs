//! Watches Metra GTFS trip updates for favorited trips and posts delay
//! notices to a Slack webhook.
//!
//! Two entry points share the same plumbing: [`once::run`] evaluates a
//! calendar of upcoming trips a single time (meant for a cron-style
//! trigger), and [`watch::run`] polls a static favorites list on a fixed
//! interval.

pub mod arrival;
pub mod calendar;
pub mod client;
pub mod config;
pub mod feed;
pub mod models;
pub mod once;
pub mod schedule;
pub mod slack;
pub mod watch;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid timestamp {value:?}: {source}")]
    Time {
        value: String,
        source: chrono::ParseError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
