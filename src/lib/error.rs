use std::io;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' not set.")]
    MissingVariable(&'static str),
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("could not list network interfaces: {0}")]
    Interfaces(#[source] io::Error),
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("could not parse {what} from {input:?}")]
    Parse { what: &'static str, input: String },
    #[error("boot time {0} is in the future")]
    BootInFuture(i64),
    #[error("not supported on this platform")]
    Unsupported,
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error(transparent)]
    Http(#[from] isahc::Error),
    #[error(transparent)]
    Request(#[from] isahc::http::Error),
    #[error("could not read response: {0}")]
    Body(#[from] io::Error),
    #[error("Prowl rejected the notification (status {status}): {message}")]
    Rejected { status: u16, message: String },
}
