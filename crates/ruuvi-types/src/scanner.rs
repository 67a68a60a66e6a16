//! Decoding of line-delimited JSON emitted by external scanner processes.
//!
//! Two reading shapes are understood:
//!
//! - flat readings, `{"address": "..", "rssi": -60, "temperature": 21.3, ..}`
//! - decoded-sensor envelopes, `{"address": "..", "timestamp": 1.7e9, "data": {..}}`,
//!   where `data` uses snake_case acceleration keys and reports the battery
//!   in millivolts.
//!
//! Scanners also print `{"status": "started"}` and
//! `{"error": "..", "exception": ".."}` lines.

use serde_json::{Map, Value};

use crate::error::{ParseError, ParseResult};
use crate::reading::{Acceleration, RawReading, finite_number, integral_rssi};

/// One line of scanner output.
#[derive(Debug, Clone, PartialEq)]
pub enum ScannerLine {
    /// Scanner lifecycle notice, e.g. `started`.
    Status(String),
    /// Scanner-side failure.
    Error {
        message: String,
        exception: Option<String>,
    },
    /// A decoded reading.
    Reading(RawReading),
}

impl ScannerLine {
    /// Parse a single line of scanner output.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the line is not JSON,
    /// [`ParseError::InvalidData`] if it is not a JSON object, and
    /// [`ParseError::MissingAddress`] if a reading has no usable address.
    pub fn parse(line: &str) -> ParseResult<Self> {
        let value: Value = serde_json::from_str(line.trim())?;
        let Value::Object(object) = value else {
            return Err(ParseError::InvalidData(format!(
                "expected a JSON object, got: {}",
                line.trim()
            )));
        };

        if let Some(message) = object.get("error") {
            return Ok(ScannerLine::Error {
                message: value_to_text(message),
                exception: object.get("exception").map(value_to_text),
            });
        }

        if !object.contains_key("address")
            && let Some(Value::String(status)) = object.get("status")
        {
            return Ok(ScannerLine::Status(status.clone()));
        }

        if let Some(Value::Object(data)) = object.get("data") {
            return envelope_reading(&object, data).map(ScannerLine::Reading);
        }

        match object.get("address") {
            Some(Value::String(_)) => {}
            _ => return Err(ParseError::MissingAddress),
        }
        let reading: RawReading = serde_json::from_value(Value::Object(object))?;
        Ok(ScannerLine::Reading(reading))
    }
}

fn envelope_reading(object: &Map<String, Value>, data: &Map<String, Value>) -> ParseResult<RawReading> {
    let address = object
        .get("address")
        .or_else(|| data.get("mac"))
        .and_then(Value::as_str)
        .filter(|a| !a.is_empty())
        .ok_or(ParseError::MissingAddress)?;

    let number = |key: &str| data.get(key).and_then(finite_number);

    let acceleration = Acceleration {
        x: number("acceleration_x"),
        y: number("acceleration_y"),
        z: number("acceleration_z"),
    };
    let has_acceleration =
        acceleration.x.is_some() || acceleration.y.is_some() || acceleration.z.is_some();

    Ok(RawReading {
        address: address.to_string(),
        name: object
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        temperature: number("temperature"),
        humidity: number("humidity"),
        pressure: number("pressure"),
        battery: number("battery").map(|millivolts| millivolts / 1000.0),
        rssi: data
            .get("rssi")
            .or_else(|| object.get("rssi"))
            .and_then(integral_rssi),
        acceleration: has_acceleration.then_some(acceleration),
    })
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        let line = ScannerLine::parse(r#"{"status": "started"}"#).unwrap();
        assert_eq!(line, ScannerLine::Status("started".to_string()));
    }

    #[test]
    fn test_error_line() {
        let line = ScannerLine::parse(
            r#"{"error": "scanner failure", "exception": "No Bluetooth adapter"}"#,
        )
        .unwrap();
        assert_eq!(
            line,
            ScannerLine::Error {
                message: "scanner failure".to_string(),
                exception: Some("No Bluetooth adapter".to_string()),
            }
        );
    }

    #[test]
    fn test_flat_reading() {
        let line = ScannerLine::parse(
            r#"{"address": "AA:BB:CC:DD:EE:01", "name": null, "rssi": -58, "temperature": 21.32}"#,
        )
        .unwrap();
        let ScannerLine::Reading(reading) = line else {
            panic!("expected a reading");
        };
        assert_eq!(reading.address, "AA:BB:CC:DD:EE:01");
        assert_eq!(reading.rssi, Some(-58));
        assert_eq!(reading.temperature, Some(21.32));
    }

    #[test]
    fn test_flat_reading_with_unknown_fields() {
        let line = ScannerLine::parse(
            r#"{"address": "AA:BB", "rssi": -70, "manufacturer_data": {"1177": "0512fc"}, "timestamp": 12.5}"#,
        )
        .unwrap();
        assert!(matches!(line, ScannerLine::Reading(r) if r.rssi == Some(-70)));
    }

    #[test]
    fn test_envelope_reading() {
        let line = ScannerLine::parse(
            r#"{
                "address": "C8:CF:E6:94:00:01",
                "timestamp": 1700000000.5,
                "data": {
                    "data_format": 5,
                    "temperature": 22.5,
                    "humidity": 45.0,
                    "pressure": 1013.25,
                    "acceleration": 1000.2,
                    "acceleration_x": -4,
                    "acceleration_y": 12,
                    "acceleration_z": 1000,
                    "battery": 2950,
                    "rssi": -65,
                    "mac": "c8cfe6940001"
                }
            }"#,
        )
        .unwrap();
        let ScannerLine::Reading(reading) = line else {
            panic!("expected a reading");
        };
        assert_eq!(reading.address, "C8:CF:E6:94:00:01");
        assert_eq!(reading.temperature, Some(22.5));
        assert_eq!(reading.pressure, Some(1013.25));
        assert_eq!(reading.battery, Some(2.95));
        assert_eq!(reading.rssi, Some(-65));
        let accel = reading.acceleration.unwrap();
        assert_eq!(accel.x, Some(-4.0));
        assert_eq!(accel.z, Some(1000.0));
    }

    #[test]
    fn test_envelope_falls_back_to_mac() {
        let line = ScannerLine::parse(r#"{"data": {"mac": "c8cfe6940001", "temperature": 1.5}}"#)
            .unwrap();
        assert!(matches!(line, ScannerLine::Reading(r) if r.address == "c8cfe6940001"));
    }

    #[test]
    fn test_envelope_without_address() {
        let result = ScannerLine::parse(r#"{"data": {"temperature": 1.5}}"#);
        assert!(matches!(result, Err(ParseError::MissingAddress)));
    }

    #[test]
    fn test_invalid_json() {
        let result = ScannerLine::parse("{not json");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn test_non_object() {
        let result = ScannerLine::parse("[1, 2, 3]");
        assert!(matches!(result, Err(ParseError::InvalidData(_))));
    }

    #[test]
    fn test_object_without_address() {
        let result = ScannerLine::parse(r#"{"rssi": -60}"#);
        assert!(matches!(result, Err(ParseError::MissingAddress)));
    }
}

/// Property-based tests for scanner line decoding.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Arbitrary input may be rejected but must never panic.
        #[test]
        fn parse_never_panics(line in "\\PC*") {
            let _ = ScannerLine::parse(&line);
        }
    }
}
