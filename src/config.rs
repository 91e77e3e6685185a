//! Credentials and endpoint identifiers, read once at startup from a local
//! JSON file.

use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "metraClient")]
    pub metra_client: String,
    #[serde(rename = "metraSecret")]
    pub metra_secret: String,
    /// Path suffix of the Slack incoming-webhook URL.
    #[serde(rename = "slackHook")]
    pub slack_hook: String,
    #[serde(rename = "googleCalendar")]
    pub google_calendar: String,
    #[serde(rename = "googleKey")]
    pub google_key: String,
    /// Agency timezone used for all arrival arithmetic.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

fn default_timezone() -> Tz {
    chrono_tz::America::Chicago
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_credentials_with_default_timezone() {
        let raw = r#"{
            "metraClient": "id",
            "metraSecret": "secret",
            "slackHook": "T000/B000/XXXX",
            "googleCalendar": "cal@group.calendar.google.com",
            "googleKey": "key"
        }"#;
        let config: Config = serde_json::from_str(raw).unwrap();
        assert_eq!(config.metra_client, "id");
        assert_eq!(config.timezone, chrono_tz::America::Chicago);
    }

    #[test]
    fn timezone_is_overridable() {
        let raw = r#"{
            "metraClient": "id",
            "metraSecret": "secret",
            "slackHook": "T000/B000/XXXX",
            "googleCalendar": "cal",
            "googleKey": "key",
            "timezone": "America/New_York"
        }"#;
        let config: Config = serde_json::from_str(raw).unwrap();
        assert_eq!(config.timezone, chrono_tz::America::New_York);
    }

    #[test]
    fn missing_key_is_an_error() {
        let raw = r#"{ "metraClient": "id" }"#;
        assert!(serde_json::from_str::<Config>(raw).is_err());
    }
}
