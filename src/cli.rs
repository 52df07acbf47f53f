use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::VERSION;
use crate::picker::PickerConfig;

/// Randomly pick a name from a list, roll call style
#[derive(Parser, Debug)]
#[command(version = VERSION, about, long_about = None)]
pub struct Args {
    /// File with one name per line to load at startup
    #[arg(env = "ROLLCALL_NAMES")]
    names: Option<PathBuf>,

    /// Milliseconds between two highlighted names while picking
    #[arg(
        long,
        env = "ROLLCALL_INTERVAL_MS",
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval_ms: u64,

    /// Seed the random source, making every pick reproducible
    #[arg(long, env = "ROLLCALL_SEED")]
    seed: Option<u64>,

    /// Write logs to this file, the terminal is taken up by the interface
    #[arg(long, env = "ROLLCALL_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log as json lines instead of the compact format
    #[arg(long, env = "ROLLCALL_LOG_JSON")]
    log_json: bool,
}

impl Args {
    pub fn names(&self) -> Option<&PathBuf> {
        self.names.as_ref()
    }

    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    pub fn log_json(&self) -> bool {
        self.log_json
    }

    pub fn picker_config(&self) -> PickerConfig {
        PickerConfig {
            interval: Duration::from_millis(self.interval_ms),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["rollcall"]).unwrap();
        assert_eq!(args.names(), None);
        assert_eq!(args.log_file(), None);
        assert!(!args.log_json());

        let config = args.picker_config();
        assert_eq!(config.interval, Duration::from_millis(100));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "rollcall",
            "class.txt",
            "--interval-ms",
            "250",
            "--seed",
            "42",
            "--log-file",
            "rollcall.log",
        ])
        .unwrap();

        assert_eq!(args.names(), Some(&PathBuf::from("class.txt")));
        assert_eq!(args.log_file(), Some(&PathBuf::from("rollcall.log")));

        let config = args.picker_config();
        assert_eq!(config.interval, Duration::from_millis(250));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Args::try_parse_from(["rollcall", "--interval-ms", "0"]).is_err());
    }
}
