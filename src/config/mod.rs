use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::document::DEFAULT_VALIDITY_DAYS;
use crate::observability::LogFormat;

/// Quote service configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "transquote")]
#[command(about = "Translation quote pricing service")]
pub struct Config {
    /// HTTP server listen address
    #[arg(long, default_value = "0.0.0.0:8080", env = "TRANSQUOTE_LISTEN_ADDR")]
    pub listen_addr: String,

    /// Path to pricing rules file (.json, otherwise YAML)
    #[arg(long, default_value = "pricing.json", env = "TRANSQUOTE_RULES_PATH")]
    pub rules_path: PathBuf,

    /// Pricing rules reload check interval in seconds
    #[arg(long, default_value = "30", env = "TRANSQUOTE_RULES_RELOAD_SECS")]
    pub rules_reload_secs: u64,

    /// Number of days an issued quote stays valid
    #[arg(long, default_value_t = DEFAULT_VALIDITY_DAYS, env = "TRANSQUOTE_VALIDITY_DAYS")]
    pub validity_days: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, env = "TRANSQUOTE_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Enable graceful shutdown
    #[arg(long, default_value = "true", env = "TRANSQUOTE_GRACEFUL_SHUTDOWN")]
    pub graceful_shutdown: bool,
}

impl Config {
    /// Get rules reload interval as Duration.
    pub fn rules_reload_interval(&self) -> Duration {
        Duration::from_secs(self.rules_reload_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: "0.0.0.0:8080".to_string(),
            rules_path: PathBuf::from("pricing.json"),
            rules_reload_secs: 30,
            validity_days: DEFAULT_VALIDITY_DAYS,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            graceful_shutdown: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.rules_path, PathBuf::from("pricing.json"));
        assert_eq!(config.validity_days, 7);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_parse_log_format() {
        let config =
            Config::try_parse_from(["transquote", "--log-format", "json"]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);

        assert!(Config::try_parse_from(["transquote", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_parse_args() {
        let config = Config::try_parse_from([
            "transquote",
            "--rules-path",
            "/etc/transquote/rules.yaml",
            "--validity-days",
            "14",
        ])
        .unwrap();

        assert_eq!(config.rules_path, PathBuf::from("/etc/transquote/rules.yaml"));
        assert_eq!(config.validity_days, 14);
    }

    #[test]
    fn test_reload_interval() {
        let config = Config {
            rules_reload_secs: 60,
            ..Default::default()
        };

        assert_eq!(config.rules_reload_interval(), Duration::from_secs(60));
    }
}
