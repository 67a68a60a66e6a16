//! The shaped device record that is stored in the cache and fingerprinted.

use core::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::identity::DeviceIdentity;
use crate::reading::RawReading;

/// Liveness of a device record.
///
/// Records produced from a fresh reading are always [`DeviceStatus::Active`].
/// The other variants exist so records written by other tools still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Active,
    Stale,
    Offline,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Active => write!(f, "active"),
            DeviceStatus::Stale => write!(f, "stale"),
            DeviceStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Snapshot of the most recent reading of one device.
///
/// Serialized with camelCase field names; optional physical fields are
/// omitted when absent while `name` is written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    /// Short identifier (first 8 characters of the device key).
    pub id: String,
    /// Human-readable device name.
    #[serde(default)]
    pub name: Option<String>,
    /// When this record was produced.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    pub status: DeviceStatus,
    /// Temperature in °C.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity in %.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Pressure in hPa.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    /// Battery voltage in V.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    /// Signal strength in dBm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_z: Option<f64>,
    /// Set to `last_updated` whenever the reading carried a temperature.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub last_temperature_update: Option<OffsetDateTime>,
}

impl DeviceRecord {
    /// Shape a raw reading into a record.
    ///
    /// `rssi` becomes `signal` and the acceleration components are flattened.
    /// The status is always [`DeviceStatus::Active`].
    #[must_use]
    pub fn from_reading(identity: &DeviceIdentity, reading: &RawReading, now: OffsetDateTime) -> Self {
        let acceleration = reading.acceleration.unwrap_or_default();
        Self {
            id: identity.short_id().to_string(),
            name: reading.name.clone(),
            last_updated: now,
            status: DeviceStatus::Active,
            temperature: reading.temperature,
            humidity: reading.humidity,
            pressure: reading.pressure,
            battery: reading.battery,
            signal: reading.rssi,
            acceleration_x: acceleration.x,
            acceleration_y: acceleration.y,
            acceleration_z: acceleration.z,
            last_temperature_update: reading.temperature.map(|_| now),
        }
    }

    /// Display name, falling back to the short id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
