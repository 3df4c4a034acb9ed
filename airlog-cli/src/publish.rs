//! Telemetry upload
//!
//! One POST per cycle to `{endpoint}/v2/devices/{device}/updates`, body
//! `{"values": {"<STREAM>": [{"timestamp": .., "value": ..}]}}`. Metrics
//! absent from the cycle are left out of the body. No retry.

use std::collections::BTreeMap;
use std::time::Duration;

use airlog_core::{Metric, ReadingSet, SensorModel, Timestamp};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info};

pub const DEFAULT_ENDPOINT: &str = "http://api-m2x.att.com";

/// Stream name under which a reading is posted
pub fn stream_key(sensor: SensorModel, metric: Metric) -> String {
    match (sensor, metric) {
        (SensorModel::Sds021, Metric::Pm25) => "SDS021_PM25".into(),
        (SensorModel::Sds021, Metric::Pm10) => "SDS021_PM10".into(),
        (SensorModel::Pms5003, Metric::Pm1) => "PMS5003_PM1".into(),
        (SensorModel::Pms5003, Metric::Pm25) => "PMS5003_PM25".into(),
        (SensorModel::Pms5003, Metric::Pm10) => "PMS5003_PM10".into(),
        (SensorModel::Dht22, Metric::Temperature) => "DHT22_Temperature".into(),
        (SensorModel::Dht22, Metric::Humidity) => "DHT22_Humidity".into(),
        (SensorModel::Microphone, Metric::SoundLevel) => "Decibels".into(),
        (sensor, metric) => format!("{}_{:?}", sensor.label(), metric),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub timestamp: Timestamp,
    pub value: f32,
}

/// Request body
#[derive(Debug, Clone, Default, Serialize)]
pub struct Payload {
    pub values: BTreeMap<String, Vec<Point>>,
}

impl Payload {
    pub fn from_readings(readings: &ReadingSet) -> Self {
        let values = readings
            .iter()
            .map(|reading| {
                (
                    stream_key(reading.sensor(), reading.metric()),
                    vec![Point {
                        timestamp: reading.captured_at(),
                        value: reading.value() as f32,
                    }],
                )
            })
            .collect();

        Self { values }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to encode payload")
    }
}

/// Posts payloads to the device updates endpoint
pub struct TelemetryPublisher {
    agent: ureq::Agent,
    url: String,
    api_key: String,
}

impl TelemetryPublisher {
    pub fn new(endpoint: &str, device: &str, api_key: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url: updates_url(endpoint, device),
            api_key: api_key.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts the payload; any non-2xx status is an error
    pub fn publish(&self, payload: &Payload) -> Result<u16> {
        let body = payload.to_json()?;
        debug!(url = %self.url, bytes = body.len(), "Posting readings");

        match self
            .agent
            .post(&self.url)
            .set("X-M2X-KEY", &self.api_key)
            .set("Content-Type", "application/json")
            .send_string(&body)
        {
            Ok(response) => {
                let status = response.status();
                info!(status, streams = payload.values.len(), "Readings posted");
                Ok(status)
            }
            Err(ureq::Error::Status(code, response)) => {
                let detail = response.into_string().unwrap_or_default();
                bail!("POST {} rejected with {}: {}", self.url, code, detail.trim())
            }
            Err(e) => bail!("POST {} failed: {}", self.url, e),
        }
    }
}

impl std::fmt::Debug for TelemetryPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryPublisher")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

pub fn updates_url(endpoint: &str, device: &str) -> String {
    format!("{}/v2/devices/{}/updates", endpoint.trim_end_matches('/'), device)
}
