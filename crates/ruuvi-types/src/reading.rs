//! Raw readings as delivered by a scanner.
//!
//! Scanner output is loosely typed. Deserialization here never fails because
//! of an optional field: a value of the wrong type, or a non-finite number,
//! is treated as if the field were absent. Only `address` is mandatory.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Acceleration components in g.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Acceleration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Acceleration {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            x: object.get("x").and_then(finite_number),
            y: object.get("y").and_then(finite_number),
            z: object.get("z").and_then(finite_number),
        })
    }
}

/// A decoded advertisement from a single beacon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Hardware address as reported by the scanner.
    pub address: String,
    /// Advertised device name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Temperature in °C.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    /// Relative humidity in %.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    /// Pressure in hPa.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pressure: Option<f64>,
    /// Battery voltage in V.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub battery: Option<f64>,
    /// Received signal strength in dBm.
    #[serde(default, deserialize_with = "lenient_rssi")]
    pub rssi: Option<i32>,
    #[serde(default, deserialize_with = "lenient_acceleration")]
    pub acceleration: Option<Acceleration>,
}

impl RawReading {
    /// Create a reading with only an address set.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_humidity(mut self, humidity: f64) -> Self {
        self.humidity = Some(humidity);
        self
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn with_battery(mut self, battery: f64) -> Self {
        self.battery = Some(battery);
        self
    }

    pub fn with_rssi(mut self, rssi: i32) -> Self {
        self.rssi = Some(rssi);
        self
    }

    pub fn with_acceleration(mut self, x: f64, y: f64, z: f64) -> Self {
        self.acceleration = Some(Acceleration {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        });
        self
    }
}

/// Interpret a JSON value as a finite `f64`, if it is one.
pub(crate) fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// Interpret a JSON value as an integral signal strength.
pub(crate) fn integral_rssi(value: &Value) -> Option<i32> {
    if let Some(v) = value.as_i64() {
        return i32::try_from(v).ok();
    }
    let v = finite_number(value)?;
    if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Some(v as i32)
    } else {
        None
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(finite_number))
}

fn lenient_rssi<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(integral_rssi))
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_acceleration<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Acceleration>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Acceleration::from_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_reading() {
        let json = r#"{
            "address": "AA:BB:CC:DD:EE:01",
            "name": "Sauna",
            "temperature": 21.32,
            "humidity": 45.0,
            "pressure": 1013.25,
            "battery": 2.95,
            "rssi": -58,
            "acceleration": {"x": 0.01, "y": -0.02, "z": 1.0}
        }"#;
        let reading: RawReading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.address, "AA:BB:CC:DD:EE:01");
        assert_eq!(reading.name.as_deref(), Some("Sauna"));
        assert_eq!(reading.temperature, Some(21.32));
        assert_eq!(reading.humidity, Some(45.0));
        assert_eq!(reading.pressure, Some(1013.25));
        assert_eq!(reading.battery, Some(2.95));
        assert_eq!(reading.rssi, Some(-58));
        let accel = reading.acceleration.unwrap();
        assert_eq!(accel.x, Some(0.01));
        assert_eq!(accel.y, Some(-0.02));
        assert_eq!(accel.z, Some(1.0));
    }

    #[test]
    fn test_address_only() {
        let reading: RawReading = serde_json::from_str(r#"{"address": "aa"}"#).unwrap();
        assert_eq!(reading, RawReading::new("aa"));
    }

    #[test]
    fn test_missing_address_is_an_error() {
        let result: Result<RawReading, _> = serde_json::from_str(r#"{"temperature": 20.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_optional_fields_become_absent() {
        let json = r#"{
            "address": "AA:BB:CC:DD:EE:01",
            "name": 42,
            "temperature": "warm",
            "humidity": null,
            "pressure": [1013],
            "battery": {"volts": 3.0},
            "rssi": -58.5,
            "acceleration": {"x": "fast", "y": 0.5, "z": null}
        }"#;
        let reading: RawReading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.name, None);
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.pressure, None);
        assert_eq!(reading.battery, None);
        assert_eq!(reading.rssi, None);
        let accel = reading.acceleration.unwrap();
        assert_eq!(accel.x, None);
        assert_eq!(accel.y, Some(0.5));
        assert_eq!(accel.z, None);
    }

    #[test]
    fn test_non_object_acceleration_is_absent() {
        let json = r#"{"address": "aa", "acceleration": 1.02}"#;
        let reading: RawReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.acceleration, None);
    }

    #[test]
    fn test_integral_float_rssi_is_accepted() {
        let json = r#"{"address": "aa", "rssi": -61.0}"#;
        let reading: RawReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.rssi, Some(-61));
    }

    #[test]
    fn test_builder() {
        let reading = RawReading::new("AA:BB")
            .with_name("Fridge")
            .with_temperature(4.5)
            .with_rssi(-70);
        assert_eq!(reading.name.as_deref(), Some("Fridge"));
        assert_eq!(reading.temperature, Some(4.5));
        assert_eq!(reading.rssi, Some(-70));
        assert_eq!(reading.humidity, None);
    }
}
