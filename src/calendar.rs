//! Google Calendar client for the favorited-trip events.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::Result;
use crate::config::Config;
use crate::models::Direction;

const CALENDAR_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/";

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEvent {
    pub description: Option<String>,
    pub start: EventStart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventStart {
    /// ISO-8601 with UTC offset, e.g. `2020-01-06T08:15:00-06:00`.
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

pub struct CalendarClient {
    http: Client,
    events_url: String,
    api_key: String,
}

impl CalendarClient {
    pub fn new(config: &Config) -> Self {
        CalendarClient {
            http: Client::new(),
            events_url: format!("{}{}/events", CALENDAR_URL, config.google_calendar),
            api_key: config.google_key.clone(),
        }
    }

    /// Fetches events whose start falls in the window, with recurring
    /// events expanded into their own objects.
    pub async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let time_min = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = end.to_rfc3339_opts(SecondsFormat::Secs, true);
        let list: EventList = self
            .http
            .get(&self.events_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(list.items)
    }
}

/// Pulls the favorite out of an event description: trip id on the first
/// line, stop id on the second, and optionally an explicit direction on the
/// third.
pub fn parse_description(description: &str) -> Option<(String, String, Option<Direction>)> {
    let mut lines = description.lines();
    let trip_id = lines.next()?.trim();
    let stop_id = lines.next()?.trim();
    if trip_id.is_empty() || stop_id.is_empty() {
        return None;
    }
    let direction = lines.next().and_then(|line| line.trim().parse().ok());
    Some((trip_id.to_string(), stop_id.to_string(), direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_splits_into_trip_and_stop() {
        let parsed = parse_description("BNSF_BN1242\nROUTE59");
        assert_eq!(
            parsed,
            Some(("BNSF_BN1242".into(), "ROUTE59".into(), None))
        );
    }

    #[test]
    fn third_line_is_an_explicit_direction() {
        let parsed = parse_description("BNSF_BN1242\nROUTE59\noutbound");
        assert_eq!(
            parsed,
            Some(("BNSF_BN1242".into(), "ROUTE59".into(), Some(Direction::Outbound)))
        );
    }

    #[test]
    fn unknown_third_line_is_ignored() {
        let parsed = parse_description("BNSF_BN1242\nROUTE59\nnotes to self");
        assert_eq!(parsed.unwrap().2, None);
    }

    #[test]
    fn single_line_description_is_rejected() {
        assert_eq!(parse_description("BNSF_BN1242"), None);
        assert_eq!(parse_description(""), None);
    }

    #[test]
    fn event_list_deserializes() {
        let raw = r#"{
            "kind": "calendar#events",
            "items": [
                {
                    "description": "BNSF_BN1242\nROUTE59",
                    "start": { "dateTime": "2020-01-06T08:15:00-06:00" }
                }
            ]
        }"#;
        let list: EventList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].start.date_time, "2020-01-06T08:15:00-06:00");
    }
}
