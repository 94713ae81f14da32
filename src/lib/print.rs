use super::error::NotificationError;
use super::report::{Report, NO_ADDRESSES};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<NotificationOutcome>,
}

#[derive(Serialize)]
struct NotificationOutcome {
    sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn report(out: &mut impl Write, report: &Report) -> io::Result<()> {
    writeln!(out, "\nHostname: {hostname}\n", hostname = report.hostname)?;
    if report.addresses.is_empty() {
        writeln!(out, "{NO_ADDRESSES}")?;
    } else {
        for iface in report.addresses.iter() {
            writeln!(out, "  Interface: {name}", name = iface.name)?;
            for address in iface.addresses.iter() {
                writeln!(out, "    IPv6 Address: {address}")?;
            }
        }
    }
    writeln!(out, "\nCurrent Time: {timestamp}", timestamp = report.timestamp)?;
    writeln!(out, "System Uptime: {uptime}\n", uptime = report.uptime)
}

/// The whole stdout of a JSON run: the report plus the send outcome, if a send was attempted.
pub fn report_json(
    out: &mut impl Write,
    report: &Report,
    notification: Option<&Result<(), NotificationError>>,
) -> io::Result<()> {
    let output = JsonOutput {
        report,
        notification: notification.map(|result| NotificationOutcome {
            sent: result.is_ok(),
            error: result.as_ref().err().map(ToString::to_string),
        }),
    };
    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)
}

pub fn notification_result(out: &mut impl Write, result: &Result<(), NotificationError>) -> io::Result<()> {
    match result {
        Ok(()) => writeln!(out, "Notification sent to Prowl successfully.\n"),
        Err(err) => writeln!(out, "Error sending notification to Prowl: {err}"),
    }
}
