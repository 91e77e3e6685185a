//! HTTP client for the Metra GTFS API.

use std::future::Future;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::config::Config;
use crate::models::{StopTime, TripUpdateEntity};

const METRA_URL: &str = "https://gtfsapi.metrarail.com/gtfs";

/// The two Metra endpoints the drivers consume. Split out as a trait so the
/// cache and driver logic can be exercised against in-memory stubs.
pub trait TransitApi {
    fn stop_times(&self) -> impl Future<Output = Result<Vec<StopTime>>>;
    fn trip_updates(&self) -> impl Future<Output = Result<Vec<TripUpdateEntity>>>;
}

pub struct MetraClient {
    http: Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl MetraClient {
    pub fn new(config: &Config) -> Self {
        MetraClient {
            http: Client::new(),
            base_url: METRA_URL.to_string(),
            client_id: config.metra_client.clone(),
            secret: config.metra_secret.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .basic_auth(&self.client_id, Some(&self.secret))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

impl TransitApi for MetraClient {
    async fn stop_times(&self) -> Result<Vec<StopTime>> {
        self.get("/schedule/stop_times").await
    }

    async fn trip_updates(&self) -> Result<Vec<TripUpdateEntity>> {
        self.get("/tripUpdates").await
    }
}
