//! Static stop-time table, cached in a local JSON file.

use std::path::Path;

use tracing::info;

use crate::Result;
use crate::client::TransitApi;
use crate::models::StopTime;

/// Loads the stop-time table, preferring the local cache file when asked.
/// A cache miss (or `prefer_local = false`) fetches the full table and
/// persists it verbatim, overwriting any previous content. There is no
/// expiry check; deleting the file forces a refetch.
pub async fn load<A: TransitApi>(
    api: &A,
    cache_path: &Path,
    prefer_local: bool,
) -> Result<Vec<StopTime>> {
    if prefer_local && cache_path.is_file() {
        info!(path = %cache_path.display(), "using local stop times");
        let raw = std::fs::read_to_string(cache_path)?;
        return Ok(serde_json::from_str(&raw)?);
    }

    info!("fetching remote stop times");
    let stop_times = api.stop_times().await?;
    std::fs::write(cache_path, serde_json::to_string(&stop_times)?)?;
    info!(rows = stop_times.len(), path = %cache_path.display(), "cached stop times");
    Ok(stop_times)
}

/// Finds the scheduled stop-time row for a trip/stop pair.
pub fn arrival_for<'a>(
    stop_times: &'a [StopTime],
    trip_id: &str,
    stop_id: &str,
) -> Option<&'a StopTime> {
    stop_times
        .iter()
        .find(|row| row.trip_id == trip_id && row.stop_id == stop_id)
}
