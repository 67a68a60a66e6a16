//! Device identity normalization.
//!
//! Scanners report the same tag as `AA:BB:CC:DD:EE:FF`, `aa-bb-cc-dd-ee-ff` or
//! `aabbccddeeff` depending on platform and library. Everything downstream is
//! keyed by the normalized form produced here.

use core::fmt;

/// Number of key characters used for the short display identifier.
pub const SHORT_ID_LEN: usize = 8;

/// Normalized identity of a beacon device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceIdentity {
    key: String,
    short_id: String,
}

impl DeviceIdentity {
    /// Normalize a raw device address.
    ///
    /// Separator characters (anything that is not an ASCII letter or digit)
    /// are removed and letters are lower-cased. The address is not validated:
    /// a malformed address simply yields a malformed, but stable, key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ruuvi_types::DeviceIdentity;
    ///
    /// let id = DeviceIdentity::from_address("AA:BB:CC:DD:EE:FF");
    /// assert_eq!(id.key(), "aabbccddeeff");
    /// assert_eq!(id.short_id(), "aabbccdd");
    /// assert_eq!(id, DeviceIdentity::from_address("aabbccddeeff"));
    /// ```
    #[must_use]
    pub fn from_address(address: &str) -> Self {
        let key: String = address
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let short_id = short_id(&key).to_string();
        Self { key, short_id }
    }

    /// The cache key: the address without separators, lower-cased.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The first [`SHORT_ID_LEN`] characters of the key.
    pub fn short_id(&self) -> &str {
        &self.short_id
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Shorthand for [`DeviceIdentity::from_address`].
#[must_use]
pub fn normalize_address(address: &str) -> DeviceIdentity {
    DeviceIdentity::from_address(address)
}

/// Short display identifier of an already normalized key.
///
/// Keys shorter than [`SHORT_ID_LEN`] characters are returned whole.
/// Keys read back from a cache file may hold any characters, so the cut
/// is made on a character boundary.
pub fn short_id(key: &str) -> &str {
    key.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(key, |(end, _)| &key[..end])
}
