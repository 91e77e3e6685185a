//! Continuous polling driver: read a favorites file once, then post a
//! status for every favorite on every pass, a fixed number of times.

use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::client::TransitApi;
use crate::feed::TripFeed;
use crate::models::Favorite;
use crate::slack::{Notify, delayed_message, on_time_message};
use crate::{Error, Result, arrival};

#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Number of repeat passes after the initial one. A value of 2 means
    /// three passes over the list with two sleeps in between.
    pub iterations: u32,
    pub interval: Duration,
}

pub fn load_favorites(path: &Path) -> Result<Vec<Favorite>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub async fn run<A: TransitApi, N: Notify>(
    api: &A,
    notifier: &N,
    favorites: &[Favorite],
    options: &WatchOptions,
    tz: Tz,
) -> Result<()> {
    let mut feed = TripFeed::new();
    for round in 0..=options.iterations {
        if round > 0 {
            tokio::time::sleep(options.interval).await;
        }
        let today = Utc::now().with_timezone(&tz).date_naive();
        run_pass(api, notifier, &mut feed, favorites, today, tz).await?;
        feed.invalidate();
        info!(round, "poll pass complete");
    }
    Ok(())
}

/// One pass over the favorites list. Posts a message per favorite whether
/// or not anything changed since the previous pass.
pub async fn run_pass<A: TransitApi, N: Notify>(
    api: &A,
    notifier: &N,
    feed: &mut TripFeed,
    favorites: &[Favorite],
    today: NaiveDate,
    tz: Tz,
) -> Result<()> {
    for favorite in favorites {
        let delay = feed.delay(api, &favorite.trip_id, &favorite.stop_id).await?;
        let message = match delay {
            Some(seconds) if seconds != 0 => {
                let time = NaiveTime::parse_from_str(&favorite.stop_time, "%H:%M").map_err(
                    |source| Error::Time {
                        value: favorite.stop_time.clone(),
                        source,
                    },
                )?;
                let Some(scheduled) = tz.from_local_datetime(&today.and_time(time)).earliest()
                else {
                    warn!(stop_time = %favorite.stop_time, "arrival falls in a DST gap, skipping");
                    continue;
                };
                let adjustment = arrival::adjust(scheduled, seconds);
                delayed_message(
                    &favorite.stop_id,
                    &favorite.stop_time,
                    favorite.direction,
                    &adjustment,
                    seconds,
                )
            }
            Some(_) => on_time_message(&favorite.stop_id, &favorite.stop_time, favorite.direction),
            None => {
                debug!(trip_id = %favorite.trip_id, stop_id = %favorite.stop_id, "trip absent from live feed");
                on_time_message(&favorite.stop_id, &favorite.stop_time, favorite.direction)
            }
        };
        notifier.post(&message).await?;
    }
    Ok(())
}
