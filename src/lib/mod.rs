#![warn(clippy::shadow_unrelated)]
pub mod args;
pub mod config;
pub mod error;
pub mod host;
pub mod interfaces;
pub mod print;
pub mod prowl;
pub mod report;
pub mod uptime;
use args::*;
use chrono::Local;
use config::Config;
use error::ConfigError;
use interfaces::{HasInterfaces, HostInterfaces, InterfaceAddressMap};
use log::{error, info, warn};
use prowl::{Notifies, Prowl, DEFAULT_ENDPOINT};
use report::Report;
use std::io::{self, Write};
use uptime::{Uptime, UptimeSource};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::new();
    let level = args.verbose.log_level_filter();
    env_logger::Builder::new().filter_level(level).init();
    info!("Log level: {level}");
    info!("Args are {:?}.", args);
    let config = Config::from_env();
    let uptime_source = uptime::detect();
    let prowl = Prowl::new(DEFAULT_ENDPOINT, &args.application);
    let mut stdout = io::stdout().lock();
    run_with(
        &args,
        config,
        || collect_report(&HostInterfaces, uptime_source.as_ref()),
        &prowl,
        &mut stdout,
    )?;
    Ok(())
}

/// Gathers the host facts. Never fails: collection problems end up as text in the report.
pub fn collect_report(source: &dyn HasInterfaces, uptime_source: &dyn UptimeSource) -> Report {
    let addresses = interfaces::active_ipv6_addresses(source).unwrap_or_else(|err| {
        warn!("{err}");
        InterfaceAddressMap::default()
    });
    info!("IPv6 addresses: {:?}", addresses);
    let uptime = Uptime::read(uptime_source);
    if let Uptime::Failed(reason) = &uptime {
        warn!("Could not read uptime: {reason}");
    }
    Report::new(host::hostname(), addresses, &Local::now(), &uptime)
}

pub fn run_with<C>(
    args: &Args,
    config: Result<Config, ConfigError>,
    collect: C,
    notifier: &dyn Notifies,
    out: &mut impl Write,
) -> io::Result<()>
where
    C: FnOnce() -> Report,
{
    let api_key = match config {
        Ok(config) => Some(config.api_key),
        Err(err) if args.dry_run => {
            info!("{err} Not needed for a dry run.");
            None
        }
        Err(err) => {
            writeln!(out, "{err}")?;
            return Ok(());
        }
    };
    let report = collect();
    if !args.json {
        print::report(out, &report)?;
    }
    let notification = match api_key {
        Some(api_key) if !args.dry_run => {
            let result = notifier.notify(&api_key, &args.event, &report.message);
            if let Err(err) = &result {
                error!("Notification failed: {err}");
            }
            Some(result)
        }
        _ => {
            info!("Dry run, no notification sent.");
            None
        }
    };
    if args.json {
        return print::report_json(out, &report, notification.as_ref());
    }
    match &notification {
        Some(result) => print::notification_result(out, result),
        None => Ok(()),
    }
}
