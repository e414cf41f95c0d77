mod platform;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use extractor_logging::LogDestination;
use platform::config::ClientConfig;

/// Terminal client for the video extraction backend.
#[derive(Parser, Debug)]
#[command(author, version, about = "Request video extractions and follow their progress.")]
struct Args {
    /// RON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration file.
    #[arg(long)]
    base_url: Option<String>,

    /// Where log records go: file, terminal, both or off.
    #[arg(long)]
    log_destination: Option<LogDestination>,

    /// Log level name (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration as RON and exit.
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Command line flags win over values read from the configuration file.
    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(destination) = self.log_destination {
            config.log.destination = destination;
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = platform::config::load(args.config.as_deref())
        .context("failed to load configuration")?;
    args.apply_overrides(&mut config);

    if args.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    extractor_logging::initialize(&config.log);
    platform::run_app(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let args = Args::parse_from([
            "extractor_app",
            "--base-url",
            "http://10.0.0.2:5000",
            "--log-destination",
            "terminal",
        ]);
        let mut config = ClientConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.log.destination, LogDestination::Terminal);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn unknown_log_destination_is_rejected() {
        assert!(Args::try_parse_from(["extractor_app", "--log-destination", "syslog"]).is_err());
    }
}
