//! Platform-agnostic types for Ruuvi beacon sensors.
//!
//! This crate holds the shapes that flow between an external scanner and the
//! change-detection cache in `ruuvi-store`. It performs no I/O.
//!
//! # Features
//!
//! - Lenient decoding of raw readings (malformed optional fields are dropped)
//! - Decoding of scanner output lines (status, error and reading messages)
//! - Device address normalization into stable cache keys
//! - The shaped [`DeviceRecord`] stored per device
//!
//! # Example
//!
//! ```
//! use ruuvi_types::{DeviceIdentity, DeviceRecord, ScannerLine};
//! use time::OffsetDateTime;
//!
//! let line = r#"{"address": "AA:BB:CC:DD:EE:01", "rssi": -58, "temperature": 21.32}"#;
//! let ScannerLine::Reading(reading) = ScannerLine::parse(line)? else {
//!     unreachable!();
//! };
//!
//! let identity = DeviceIdentity::from_address(&reading.address);
//! let record = DeviceRecord::from_reading(&identity, &reading, OffsetDateTime::now_utc());
//! assert_eq!(identity.key(), "aabbccddee01");
//! assert_eq!(record.id, "aabbccdd");
//! assert_eq!(record.signal, Some(-58));
//! # Ok::<(), ruuvi_types::ParseError>(())
//! ```

pub mod error;
pub mod identity;
pub mod reading;
pub mod record;
pub mod scanner;

pub use error::{ParseError, ParseResult};
pub use identity::{DeviceIdentity, SHORT_ID_LEN, normalize_address, short_id};
pub use reading::{Acceleration, RawReading};
pub use record::{DeviceRecord, DeviceStatus};
pub use scanner::ScannerLine;
