//! Output formatting for cache reports.

use std::fmt::Write as _;

use anyhow::Result;
use ruuvi_types::DeviceRecord;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Summary of the cache file, as printed by `inspect`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub path: String,
    pub version: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
    pub total: usize,
    pub allowed: usize,
    pub pending_send: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub most_recent_sent: Option<OffsetDateTime>,
    pub allowed_tags: Vec<String>,
    pub pending_tags: Vec<String>,
    pub devices: Vec<DeviceSummary>,
}

/// One cache entry in an [`InspectReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub key: String,
    pub id: String,
    pub name: Option<String>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_sent: Option<OffsetDateTime>,
    pub changed_since_sent: bool,
}

/// Serialize a value as pretty JSON with a trailing newline.
pub fn as_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

/// Format a timestamp as RFC 3339, or `never`.
#[must_use]
pub fn format_time(at: Option<OffsetDateTime>) -> String {
    match at {
        Some(at) => at.format(&Rfc3339).unwrap_or_else(|_| at.to_string()),
        None => "never".to_string(),
    }
}

fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

#[must_use]
pub fn format_inspect_text(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Cache: {} (version {})", report.path, report.version);
    let _ = writeln!(out, "Last updated: {}", format_time(report.last_updated));
    let _ = writeln!(
        out,
        "Entries: {} total, {} configured, {} pending send",
        report.total, report.allowed, report.pending_send
    );
    let _ = writeln!(out, "Last sent: {}", format_time(report.most_recent_sent));
    let _ = writeln!(out, "Configured tags: {}", format_list(&report.allowed_tags));
    let _ = writeln!(out, "Pending tags: {}", format_list(&report.pending_tags));

    if !report.devices.is_empty() {
        let _ = writeln!(out, "\nDevices:");
        for device in &report.devices {
            let _ = writeln!(
                out,
                "  {} {} - {} ({})",
                if device.changed_since_sent { "*" } else { " " },
                device.id,
                device.name.as_deref().unwrap_or("(unnamed)"),
                device.status
            );
            let _ = writeln!(out, "      Updated: {}", format_time(Some(device.last_updated)));
            let _ = writeln!(out, "      Sent:    {}", format_time(device.last_sent));
        }
    }
    out
}

/// One line per record: id, name and whatever measurements are present.
#[must_use]
pub fn format_pending_text(records: &[&DeviceRecord]) -> String {
    if records.is_empty() {
        return "No pending records.\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let mut line = format!("{}  {}", record.id, record.display_name());
        if let Some(t) = record.temperature {
            let _ = write!(line, "  {:.1}°C", t);
        }
        if let Some(h) = record.humidity {
            let _ = write!(line, "  {:.1}%", h);
        }
        if let Some(p) = record.pressure {
            let _ = write!(line, "  {:.2} hPa", p);
        }
        if let Some(b) = record.battery {
            let _ = write!(line, "  {:.2} V", b);
        }
        if let Some(s) = record.signal {
            let _ = write!(line, "  {} dBm", s);
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruuvi_types::{DeviceIdentity, RawReading};
    use time::macros::datetime;

    fn report() -> InspectReport {
        InspectReport {
            path: "ruuvi-cache.json".to_string(),
            version: "1.0.0".to_string(),
            last_updated: Some(datetime!(2026-03-01 12:00:00 UTC)),
            total: 2,
            allowed: 1,
            pending_send: 1,
            most_recent_sent: None,
            allowed_tags: vec!["aabbccdd".to_string()],
            pending_tags: vec!["aabbccdd".to_string()],
            devices: vec![DeviceSummary {
                key: "aabbccddee01".to_string(),
                id: "aabbccdd".to_string(),
                name: Some("Sauna".to_string()),
                status: "active".to_string(),
                last_updated: datetime!(2026-03-01 11:59:00 UTC),
                last_sent: None,
                changed_since_sent: true,
            }],
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(None), "never");
        assert_eq!(
            format_time(Some(datetime!(2026-03-01 12:00:00 UTC))),
            "2026-03-01T12:00:00Z"
        );
    }

    #[test]
    fn test_inspect_text() {
        let text = format_inspect_text(&report());
        assert!(text.contains("Entries: 2 total, 1 configured, 1 pending send"));
        assert!(text.contains("Configured tags: aabbccdd"));
        assert!(text.contains("Last sent: never"));
        assert!(text.contains("* aabbccdd - Sauna (active)"));
    }

    #[test]
    fn test_inspect_json_field_names() {
        let json: serde_json::Value = serde_json::from_str(&as_json(&report()).unwrap()).unwrap();
        assert_eq!(json["pendingSend"], 1);
        assert_eq!(json["mostRecentSent"], serde_json::Value::Null);
        assert_eq!(json["allowedTags"][0], "aabbccdd");
        assert_eq!(json["devices"][0]["changedSinceSent"], true);
        assert_eq!(json["lastUpdated"], "2026-03-01T12:00:00Z");
    }

    #[test]
    fn test_pending_text() {
        assert_eq!(format_pending_text(&[]), "No pending records.\n");

        let reading = RawReading::new("AA:BB:CC:DD:EE:01")
            .with_name("Sauna")
            .with_temperature(21.32)
            .with_rssi(-58);
        let identity = DeviceIdentity::from_address(&reading.address);
        let record = DeviceRecord::from_reading(&identity, &reading, datetime!(2026-03-01 12:00:00 UTC));

        assert_eq!(format_pending_text(&[&record]), "aabbccdd  Sauna  21.3°C  -58 dBm\n");
    }
}
