//! Slack webhook notifier and the message templates both drivers share.

use std::fmt;
use std::future::Future;

use chrono::TimeZone;
use reqwest::Client;
use serde_json::json;
use tracing::warn;

use crate::Result;
use crate::arrival::{Adjustment, format_delta};
use crate::config::Config;
use crate::models::Direction;

const SLACK_URL: &str = "https://hooks.slack.com/services/";

pub const RED: &str = "#D00000";
pub const YELLOW: &str = "#D0D000";
pub const GREEN: &str = "#00D000";

const TIME_FORMAT: &str = "%H:%M";

/// One notification: built, posted, dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub text: String,
    pub color: &'static str,
}

pub trait Notify {
    fn post(&self, message: &Message) -> impl Future<Output = Result<()>>;
}

pub struct SlackNotifier {
    http: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(config: &Config) -> Self {
        SlackNotifier {
            http: Client::new(),
            webhook_url: format!("{}{}", SLACK_URL, config.slack_hook),
        }
    }
}

impl Notify for SlackNotifier {
    /// Posts the message. Webhook failures are logged and swallowed; a lost
    /// notification is not worth aborting a run over.
    async fn post(&self, message: &Message) -> Result<()> {
        let result = self
            .http
            .post(&self.webhook_url)
            .json(&payload(message))
            .send()
            .await;
        match result {
            Ok(response) => {
                if let Err(error) = response.error_for_status() {
                    warn!(%error, "webhook rejected message");
                }
            }
            Err(error) => warn!(%error, "webhook post failed"),
        }
        Ok(())
    }
}

fn payload(message: &Message) -> serde_json::Value {
    json!({
        "username": "Metra Updates",
        "channel": "#metra",
        "icon_emoji": ":steam_locomotive:",
        "attachments": [
            {
                "fallback": message.text,
                "color": message.color,
                "fields": [
                    {
                        "title": message.title,
                        "value": message.text,
                        "short": false
                    }
                ]
            }
        ]
    })
}

pub fn delayed_message<Tz: TimeZone>(
    stop_id: &str,
    normal_time: &str,
    direction: Direction,
    adjustment: &Adjustment<Tz>,
    delay_seconds: i32,
) -> Message
where
    Tz::Offset: fmt::Display,
{
    let sign = if delay_seconds > 0 { '+' } else { '-' };
    Message {
        title: stop_id.to_string(),
        text: format!(
            "{} arrival for {} {} train. ({}{})",
            adjustment.adjusted.format(TIME_FORMAT),
            normal_time,
            direction,
            sign,
            format_delta(adjustment.magnitude),
        ),
        color: if adjustment.is_late { RED } else { YELLOW },
    }
}

pub fn on_time_message(stop_id: &str, normal_time: &str, direction: Direction) -> Message {
    Message {
        title: stop_id.to_string(),
        text: format!("{} {} train is arriving on time.", normal_time, direction),
        color: GREEN,
    }
}
