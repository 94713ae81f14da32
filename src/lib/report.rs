use super::interfaces::InterfaceAddressMap;
use super::uptime::Uptime;
use chrono::{DateTime, TimeZone};
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Display;

pub const NO_ADDRESSES: &str = "No active IPv6 addresses found.";
const TIMESTAMP_FORMAT: &str = "%a %Y-%m-%d %H:%M";

/// Facts gathered in one run plus the message sent for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub hostname: String,
    pub addresses: InterfaceAddressMap,
    pub timestamp: String,
    pub uptime: String,
    pub message: String,
}

impl Report {
    pub fn new<Tz>(hostname: String, addresses: InterfaceAddressMap, now: &DateTime<Tz>, uptime: &Uptime) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let timestamp = format_timestamp(now);
        let uptime = uptime.to_string();
        let message = format_message(&hostname, &addresses, &timestamp, &uptime);
        Report {
            hostname,
            addresses,
            timestamp,
            uptime,
            message,
        }
    }
}

pub fn format_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_addresses(addresses: &InterfaceAddressMap) -> String {
    if addresses.is_empty() {
        return NO_ADDRESSES.to_owned();
    }
    addresses
        .iter()
        .map(|entry| format!("{}: {}", entry.name, entry.addresses.iter().join(", ")))
        .join("\n")
}

pub fn format_message(hostname: &str, addresses: &InterfaceAddressMap, timestamp: &str, uptime: &str) -> String {
    format!(
        "Hostname: {hostname}\n\nIPv6 Addresses:\n{addresses}\n\nCurrent Time: {timestamp}\nSystem Uptime: {uptime}\n",
        addresses = format_addresses(addresses)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn monday_afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 59).unwrap()
    }

    #[test]
    fn formats_timestamp_without_seconds() {
        assert_eq!("Mon 2024-01-15 14:30", format_timestamp(&monday_afternoon()));
    }

    #[test]
    fn formats_one_line_per_interface() {
        let addresses: InterfaceAddressMap = vec![
            ("eth0", vec!["2001:db8::1"]),
            ("wlan0", vec!["2001:db8::2", "2001:db8::3"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            "eth0: 2001:db8::1\nwlan0: 2001:db8::2, 2001:db8::3",
            format_addresses(&addresses)
        );
    }

    #[test]
    fn full_message_layout() {
        let addresses: InterfaceAddressMap = vec![("eth0", vec!["2001:db8::1"])].into_iter().collect();
        let report = Report::new(
            "myhost".to_owned(),
            addresses,
            &monday_afternoon(),
            &Uptime::Known(Duration::from_secs(3725)),
        );
        assert_eq!(
            "Hostname: myhost\n\nIPv6 Addresses:\neth0: 2001:db8::1\n\nCurrent Time: Mon 2024-01-15 14:30\nSystem Uptime: 1:02:05\n",
            report.message
        );
        assert_eq!("Mon 2024-01-15 14:30", report.timestamp);
        assert_eq!("1:02:05", report.uptime);
    }

    #[test]
    fn empty_map_reports_no_addresses() {
        let report = Report::new(
            "myhost".to_owned(),
            InterfaceAddressMap::default(),
            &monday_afternoon(),
            &Uptime::Unavailable,
        );
        assert!(report.message.contains("IPv6 Addresses:\nNo active IPv6 addresses found.\n"));
        assert!(report
            .message
            .contains("System Uptime: System uptime is not available on this platform.\n"));
    }

    #[test]
    fn serializes_to_json() {
        let addresses: InterfaceAddressMap = vec![("eth0", vec!["2001:db8::1"])].into_iter().collect();
        let report = Report::new(
            "myhost".to_owned(),
            addresses,
            &monday_afternoon(),
            &Uptime::Failed("boom".to_owned()),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!("myhost", json["hostname"]);
        assert_eq!("2001:db8::1", json["addresses"]["eth0"][0]);
        assert_eq!("Error retrieving uptime: boom", json["uptime"]);
    }
}
