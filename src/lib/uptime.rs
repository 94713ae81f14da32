use super::error::PlatformError;
use log::debug;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub trait UptimeSource {
    fn uptime(&self) -> Result<Duration, PlatformError>;
}

/// Reads the boot time through `sysctl kern.boottime` (macOS and the BSDs).
pub struct SysctlBootTime;

impl UptimeSource for SysctlBootTime {
    fn uptime(&self) -> Result<Duration, PlatformError> {
        const SYSCTL: &str = "sysctl";
        const BOOTTIME_ARGS: [&str; 2] = ["-n", "kern.boottime"];
        let command = format!("{SYSCTL} {}", BOOTTIME_ARGS.join(" "));
        let output = Command::new(SYSCTL)
            .args(BOOTTIME_ARGS)
            .output()
            .map_err(|source| PlatformError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(PlatformError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("kern.boottime: {}", stdout.trim());
        uptime_since_boot(parse_boot_time(&stdout)?, SystemTime::now())
    }
}

/// Parses the epoch seconds out of `{ sec = 1700000000, usec = 0 } Tue Nov 14 22:13:20 2023`.
pub fn parse_boot_time(output: &str) -> Result<i64, PlatformError> {
    output
        .trim()
        .split(',')
        .next()
        .and_then(|field| field.rsplit('=').next())
        .and_then(|sec| sec.trim().parse().ok())
        .ok_or_else(|| PlatformError::Parse {
            what: "boot time",
            input: output.trim().to_owned(),
        })
}

pub fn uptime_since_boot(boot_time: i64, now: SystemTime) -> Result<Duration, PlatformError> {
    let boot = u64::try_from(boot_time)
        .map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
        .map_err(|_| PlatformError::Parse {
            what: "boot time",
            input: boot_time.to_string(),
        })?;
    now.duration_since(boot)
        .map_err(|_| PlatformError::BootInFuture(boot_time))
}

/// Reads elapsed seconds from the kernel's uptime counter (Linux).
pub struct ProcUptime {
    path: PathBuf,
}

impl Default for ProcUptime {
    fn default() -> Self {
        ProcUptime {
            path: PathBuf::from("/proc/uptime"),
        }
    }
}

impl ProcUptime {
    #[cfg(test)]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProcUptime { path: path.into() }
    }
}

impl UptimeSource for ProcUptime {
    fn uptime(&self) -> Result<Duration, PlatformError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| PlatformError::Read {
            path: self.path.display().to_string(),
            source,
        })?;
        parse_proc_uptime(&contents)
    }
}

pub fn parse_proc_uptime(contents: &str) -> Result<Duration, PlatformError> {
    contents
        .split_whitespace()
        .next()
        .and_then(|secs| secs.parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| PlatformError::Parse {
            what: "uptime",
            input: contents.trim().to_owned(),
        })
}

pub struct Unsupported;

impl UptimeSource for Unsupported {
    fn uptime(&self) -> Result<Duration, PlatformError> {
        Err(PlatformError::Unsupported)
    }
}

/// Picks the uptime strategy for the platform this binary was built for.
pub fn detect() -> Box<dyn UptimeSource> {
    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        Box::new(SysctlBootTime)
    }
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        Box::new(ProcUptime::default())
    }
    #[cfg(not(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly",
        target_os = "linux",
        target_os = "android"
    )))]
    {
        Box::new(Unsupported)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uptime {
    Known(Duration),
    Unavailable,
    Failed(String),
}

impl Uptime {
    pub fn read(source: &dyn UptimeSource) -> Uptime {
        match source.uptime() {
            Ok(duration) => Uptime::Known(duration),
            Err(PlatformError::Unsupported) => Uptime::Unavailable,
            Err(err) => Uptime::Failed(err.to_string()),
        }
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uptime::Known(duration) => {
                let secs = duration.as_secs();
                write!(f, "{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
            }
            Uptime::Unavailable => f.write_str("System uptime is not available on this platform."),
            Uptime::Failed(reason) => write!(f, "Error retrieving uptime: {reason}"),
        }
    }
}
