//! Noise-tolerant content fingerprints.
//!
//! A fingerprint covers only the significant fields of a [`DeviceRecord`]
//! (`temperature`, `humidity`, `pressure`, `battery`, `signal`, `status`).
//! Measurements are quantized first, so jitter below the quantization step
//! does not change the fingerprint. Signal strength is used as-is.
//!
//! The encoding is compact JSON with a fixed field order (absent fields are
//! written as `null`), then standard base64.

use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use ruuvi_types::{DeviceRecord, DeviceStatus};

use crate::error::{Error, Result};

/// Temperature is compared at 0.1 °C.
pub const TEMPERATURE_SCALE: f64 = 10.0;
/// Humidity is compared at 0.1 %.
pub const HUMIDITY_SCALE: f64 = 10.0;
/// Pressure is compared at 0.01 hPa.
pub const PRESSURE_SCALE: f64 = 100.0;
/// Battery is compared at 0.01 V.
pub const BATTERY_SCALE: f64 = 100.0;

// Field order here is the encoding order.
#[derive(Serialize)]
struct SignificantFields {
    temperature: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    battery: Option<f64>,
    signal: Option<i32>,
    status: DeviceStatus,
}

impl SignificantFields {
    fn of(record: &DeviceRecord) -> Self {
        Self {
            temperature: record.temperature.map(|v| quantize(v, TEMPERATURE_SCALE)),
            humidity: record.humidity.map(|v| quantize(v, HUMIDITY_SCALE)),
            pressure: record.pressure.map(|v| quantize(v, PRESSURE_SCALE)),
            battery: record.battery.map(|v| quantize(v, BATTERY_SCALE)),
            signal: record.signal,
            status: record.status,
        }
    }
}

/// Round `value` to the nearest multiple of `1 / scale`.
///
/// Halfway cases round toward positive infinity, so `-21.25` and `-21.2`
/// share a bucket. Negative zero is folded into zero, and values too large
/// to scale are returned unchanged.
///
/// ```
/// use ruuvi_store::fingerprint::quantize;
///
/// assert_eq!(quantize(21.32, 10.0), 21.3);
/// assert_eq!(quantize(21.25, 10.0), 21.3);
/// assert_eq!(quantize(-21.25, 10.0), -21.2);
/// ```
#[must_use]
pub fn quantize(value: f64, scale: f64) -> f64 {
    let quantized = round_half_up(value * scale) / scale;
    if !quantized.is_finite() {
        value
    } else if quantized == 0.0 {
        0.0
    } else {
        quantized
    }
}

// `f64::round` sends negative halves away from zero; pull them back up.
fn round_half_up(scaled: f64) -> f64 {
    let rounded = scaled.round();
    if scaled - rounded == 0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

/// Compute the fingerprint of a record.
///
/// Identity and bookkeeping fields (`id`, `name`, `lastUpdated`,
/// `lastTemperatureUpdate`, acceleration) do not contribute.
///
/// # Errors
///
/// Returns [`Error::Fingerprint`] if the significant fields cannot be encoded.
pub fn fingerprint(record: &DeviceRecord) -> Result<String> {
    let encoded = serde_json::to_string(&SignificantFields::of(record)).map_err(Error::Fingerprint)?;
    Ok(general_purpose::STANDARD.encode(encoded))
}
