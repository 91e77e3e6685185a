//! Delay lookup against the live trip-update feed, memoized per polling
//! cycle.

use tracing::info;

use crate::Result;
use crate::client::TransitApi;
use crate::models::TripUpdateEntity;

/// The memoized live feed. Owned by the driver and passed by reference so
/// invalidation is an explicit call rather than hidden process state.
#[derive(Debug, Default)]
pub struct TripFeed {
    updates: Option<Vec<TripUpdateEntity>>,
}

impl TripFeed {
    pub fn new() -> Self {
        TripFeed::default()
    }

    /// Returns the arrival delay in seconds for a trip/stop pair, fetching
    /// the feed on the first call of a cycle and reusing it afterwards.
    ///
    /// `None` means the trip or stop is absent from the feed, which is not
    /// the same thing as a reported zero delay.
    pub async fn delay<A: TransitApi>(
        &mut self,
        api: &A,
        trip_id: &str,
        stop_id: &str,
    ) -> Result<Option<i32>> {
        if self.updates.is_none() {
            let updates = api.trip_updates().await?;
            info!(entities = updates.len(), "fetched trip updates");
            self.updates = Some(updates);
        }
        let updates = self.updates.as_deref().unwrap_or(&[]);
        Ok(find_delay(updates, trip_id, stop_id))
    }

    /// Drops the memoized feed so the next lookup refetches.
    pub fn invalidate(&mut self) {
        self.updates = None;
    }
}

/// Linear scan: entity whose id matches the trip, then the stop-time update
/// whose stop matches.
pub fn find_delay(updates: &[TripUpdateEntity], trip_id: &str, stop_id: &str) -> Option<i32> {
    updates
        .iter()
        .find(|entity| entity.id == trip_id)?
        .trip_update
        .stop_time_update
        .iter()
        .find(|update| update.stop_id == stop_id)?
        .arrival
        .as_ref()?
        .delay
}
