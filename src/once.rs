//! Scheduled single-pass driver: evaluate every calendar event in a ±3 hour
//! window around now and post a notice for each one whose adjusted arrival
//! drifted from the time recorded on the event.

use std::path::Path;

use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::calendar::{CalendarClient, CalendarEvent, parse_description};
use crate::client::TransitApi;
use crate::feed::TripFeed;
use crate::models::{Direction, StopTime};
use crate::slack::{Message, Notify, delayed_message, on_time_message};
use crate::{Error, Result, arrival, schedule};

pub async fn run<A: TransitApi, N: Notify>(
    api: &A,
    calendar: &CalendarClient,
    notifier: &N,
    cache_path: &Path,
    tz: Tz,
) -> Result<()> {
    let stop_times = schedule::load(api, cache_path, true).await?;
    let now = Utc::now();
    let window = TimeDelta::hours(3);
    let events = calendar.events_between(now - window, now + window).await?;
    info!(events = events.len(), "evaluating calendar window");

    let mut feed = TripFeed::new();
    for event in &events {
        if let Some(message) = evaluate_event(api, &mut feed, &stop_times, event, tz).await? {
            notifier.post(&message).await?;
        }
    }
    Ok(())
}

/// Evaluates one event against the live feed. `None` means nothing changed
/// or the event could not be matched to the schedule.
pub async fn evaluate_event<A: TransitApi>(
    api: &A,
    feed: &mut TripFeed,
    stop_times: &[StopTime],
    event: &CalendarEvent,
    tz: Tz,
) -> Result<Option<Message>> {
    let Some(description) = event.description.as_deref() else {
        warn!("event has no description, skipping");
        return Ok(None);
    };
    let Some((trip_id, stop_id, explicit_direction)) = parse_description(description) else {
        warn!(description, "event description is not a trip/stop pair, skipping");
        return Ok(None);
    };
    let Some(row) = schedule::arrival_for(stop_times, &trip_id, &stop_id) else {
        warn!(%trip_id, %stop_id, "no scheduled stop time for event, skipping");
        return Ok(None);
    };
    let nominal = row.arrival()?;
    let normal_time = nominal.format("%H:%M").to_string();

    let previous = DateTime::parse_from_str(&event.start.date_time, "%Y-%m-%dT%H:%M:%S%z")
        .map_err(|source| Error::Time {
            value: event.start.date_time.clone(),
            source,
        })?
        .with_timezone(&tz);
    let Some(scheduled) = tz
        .from_local_datetime(&previous.date_naive().and_time(nominal))
        .earliest()
    else {
        warn!(%trip_id, %stop_id, "scheduled arrival falls in a DST gap, skipping");
        return Ok(None);
    };

    // Before-noon trains are assumed inbound when the event does not say.
    // Wrong for late-morning outbound runs; put the direction on the third
    // description line to override it.
    let direction = explicit_direction.unwrap_or(if nominal.hour() < 12 {
        Direction::Inbound
    } else {
        Direction::Outbound
    });

    let delay = feed.delay(api, &trip_id, &stop_id).await?;
    if delay.is_none() {
        debug!(%trip_id, %stop_id, "trip absent from live feed");
    }
    let delay_seconds = delay.unwrap_or(0);

    let adjustment = arrival::adjust(scheduled, delay_seconds);
    let difference = adjustment.adjusted.clone() - previous;
    if difference.is_zero() {
        return Ok(None);
    }

    let message = if delay_seconds == 0 {
        on_time_message(&stop_id, &normal_time, direction)
    } else {
        delayed_message(&stop_id, &normal_time, direction, &adjustment, delay_seconds)
    };
    Ok(Some(message))
}

#[cfg(test)]
mod tests {
    use chrono_tz::America::Chicago;

    use super::*;
    use crate::calendar::EventStart;
    use crate::models::{StopTimeEvent, StopTimeUpdate, TripUpdate, TripUpdateEntity};
    use crate::slack::{GREEN, RED, YELLOW};

    struct StaticApi {
        updates: Vec<TripUpdateEntity>,
    }

    impl TransitApi for StaticApi {
        async fn stop_times(&self) -> crate::Result<Vec<StopTime>> {
            unreachable!()
        }

        async fn trip_updates(&self) -> crate::Result<Vec<TripUpdateEntity>> {
            Ok(self.updates.clone())
        }
    }

    fn table() -> Vec<StopTime> {
        vec![StopTime {
            stop_id: "S1".into(),
            trip_id: "T1".into(),
            arrival_time: "08:15:00".into(),
        }]
    }

    fn event(start: &str) -> CalendarEvent {
        CalendarEvent {
            description: Some("T1\nS1".into()),
            start: EventStart {
                date_time: start.into(),
            },
        }
    }

    fn api_with_delay(delay: i32) -> StaticApi {
        StaticApi {
            updates: vec![TripUpdateEntity {
                id: "T1".into(),
                trip_update: TripUpdate {
                    stop_time_update: vec![StopTimeUpdate {
                        stop_id: "S1".into(),
                        arrival: Some(StopTimeEvent { delay: Some(delay) }),
                    }],
                },
            }],
        }
    }

    #[tokio::test]
    async fn delayed_trip_posts_a_red_notice() {
        let api = api_with_delay(120);
        let mut feed = TripFeed::new();
        let message =
            evaluate_event(&api, &mut feed, &table(), &event("2020-01-06T08:15:00-06:00"), Chicago)
                .await
                .unwrap()
                .expect("a two minute delay should notify");

        assert_eq!(message.title, "S1");
        assert_eq!(message.color, RED);
        assert!(message.text.contains("08:17"));
        assert!(message.text.contains('+'));
    }

    #[tokio::test]
    async fn early_trip_posts_a_yellow_notice() {
        let api = api_with_delay(-60);
        let mut feed = TripFeed::new();
        let message =
            evaluate_event(&api, &mut feed, &table(), &event("2020-01-06T08:15:00-06:00"), Chicago)
                .await
                .unwrap()
                .expect("an early arrival should notify");

        assert_eq!(message.color, YELLOW);
        assert!(message.text.contains("08:14"));
        assert!(message.text.contains('-'));
    }

    #[tokio::test]
    async fn unchanged_arrival_stays_quiet() {
        let api = api_with_delay(0);
        let mut feed = TripFeed::new();
        let message =
            evaluate_event(&api, &mut feed, &table(), &event("2020-01-06T08:15:00-06:00"), Chicago)
                .await
                .unwrap();
        assert_eq!(message, None);
    }

    #[tokio::test]
    async fn on_time_trip_corrects_a_drifted_event() {
        // The event was previously pushed to 08:20; the trip is back on
        // schedule, so the notice is the green on-time template.
        let api = api_with_delay(0);
        let mut feed = TripFeed::new();
        let message =
            evaluate_event(&api, &mut feed, &table(), &event("2020-01-06T08:20:00-06:00"), Chicago)
                .await
                .unwrap()
                .expect("a drifted event should notify");

        assert_eq!(message.color, GREEN);
        assert_eq!(message.text, "08:15 inbound train is arriving on time.");
    }

    #[tokio::test]
    async fn explicit_direction_overrides_the_heuristic() {
        let api = api_with_delay(120);
        let mut feed = TripFeed::new();
        let mut ev = event("2020-01-06T08:15:00-06:00");
        ev.description = Some("T1\nS1\noutbound".into());
        let message = evaluate_event(&api, &mut feed, &table(), &ev, Chicago)
            .await
            .unwrap()
            .unwrap();
        assert!(message.text.contains("outbound"));
    }

    #[tokio::test]
    async fn unmatched_event_is_skipped() {
        let api = api_with_delay(120);
        let mut feed = TripFeed::new();
        let mut ev = event("2020-01-06T08:15:00-06:00");
        ev.description = Some("T9\nS9".into());
        let message = evaluate_event(&api, &mut feed, &table(), &ev, Chicago)
            .await
            .unwrap();
        assert_eq!(message, None);
    }
}
