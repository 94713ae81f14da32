use super::prowl::DEFAULT_APPLICATION;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"), about = "Sends this host's IPv6 addresses and uptime through Prowl", long_about = None)]
pub struct Args {
    #[arg(short, long, default_value = "System Info", help = "Event label of the notification")]
    pub event: String,
    #[arg(long, default_value = DEFAULT_APPLICATION, help = "Application name shown by Prowl")]
    pub application: String,
    #[arg(long, help = "Only print the report, do not send a notification")]
    pub dry_run: bool,
    #[arg(long, help = "Print the report as JSON")]
    pub json: bool,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

impl Args {
    pub fn new() -> Args {
        Args::parse()
    }
    #[allow(dead_code)]
    pub(crate) fn new_from<I, T>(args: I) -> Args
    where
        I: Iterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Args::parse_from(args)
    }
}

impl Default for Args {
    fn default() -> Self {
        Self::new()
    }
}
