//! Serde models for the Metra schedule and trip-update feeds and for the
//! operator-supplied favorites list. The feeds are plain JSON, so these are
//! hand-defined rather than generated from the GTFS-realtime protobuf.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One row of the static schedule table. Written to and read from the
/// local cache file verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTime {
    pub stop_id: String,
    pub trip_id: String,
    /// Local wall-clock arrival, `HH:MM:SS`, no date component.
    pub arrival_time: String,
}

impl StopTime {
    pub fn arrival(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.arrival_time, "%H:%M:%S").map_err(|source| Error::Time {
            value: self.arrival_time.clone(),
            source,
        })
    }
}

/// One entry of the live trip-update feed. The entity id doubles as the
/// trip id in the Metra feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripUpdateEntity {
    pub id: String,
    pub trip_update: TripUpdate,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripUpdate {
    #[serde(default)]
    pub stop_time_update: Vec<StopTimeUpdate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopTimeUpdate {
    pub stop_id: String,
    pub arrival: Option<StopTimeEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopTimeEvent {
    /// Signed seconds of schedule deviation, positive = late.
    pub delay: Option<i32>,
}

/// An operator-selected (trip, stop) pair to monitor, as read from the
/// favorites input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Favorite {
    pub stop_id: String,
    /// Scheduled wall-clock arrival, `HH:MM`.
    pub stop_time: String,
    pub trip_id: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => f.write_str("inbound"),
            Direction::Outbound => f.write_str("outbound"),
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("inbound") {
            Ok(Direction::Inbound)
        } else if s.eq_ignore_ascii_case("outbound") {
            Ok(Direction::Outbound)
        } else {
            Err(())
        }
    }
}
