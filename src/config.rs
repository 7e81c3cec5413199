use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub logging: LoggingConfig,
    pub parking_api: ParkingApiConfig,
    pub intervals: IntervalConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub directory: String,
    pub debug_file: String,
    pub info_file: String,
    pub warn_file: String,
    pub error_file: String,
    pub console_level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ParkingApiConfig {
    pub base_url: String,
    pub connect_timeout_seconds: u64,
    pub read_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IntervalConfig {
    pub refresh_interval_ms: u64,
}

impl IntervalConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LimitsConfig {
    pub command_channel_size: usize,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `path`, writing an example config only when the file does not
    /// exist yet. A file that exists but fails to parse is left untouched.
    pub fn load_or_create_example(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            return Self::from_file(path);
        }
        println!("Config file not found. Creating example {}...", path);
        Self::save_example(path)?;
        println!("Please edit {} with your settings and restart the application.", path);
        Err(anyhow::anyhow!("No config file at {}", path))
    }

    pub fn save_example(path: &str) -> Result<()> {
        let toml_content = toml::to_string_pretty(&Self::example())?;
        fs::write(path, toml_content)?;
        Ok(())
    }

    pub fn example() -> Self {
        Config {
            logging: LoggingConfig {
                directory: "./logs".to_string(),
                debug_file: "log_debug.log".to_string(),
                info_file: "log_info.log".to_string(),
                warn_file: "log_warn.log".to_string(),
                error_file: "log_error.log".to_string(),
                console_level: "info".to_string(),
            },
            parking_api: ParkingApiConfig {
                base_url: "https://smart-parking-44.vercel.app/api".to_string(),
                connect_timeout_seconds: 15,
                read_timeout_seconds: 15,
            },
            intervals: IntervalConfig {
                refresh_interval_ms: 5000,
            },
            limits: LimitsConfig {
                command_channel_size: 10,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn example_config_round_trips_through_file() {
        let path = temp_config_path("round-trip");

        Config::save_example(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, Config::example());
        assert_eq!(
            loaded.intervals.refresh_interval(),
            Duration::from_millis(5000)
        );
    }

    fn temp_config_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("smart-parking-monitor-{}-{}.toml", name, std::process::id()))
            .to_string_lossy()
            .to_string()
    }

    #[test]
    fn broken_config_is_not_overwritten() {
        let path = temp_config_path("broken");
        let broken = "[intervals]\nrefresh_interval_ms = \"x\"\n";
        fs::write(&path, broken).unwrap();

        let result = Config::load_or_create_example(&path);
        let contents = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert!(result.is_err());
        assert_eq!(contents, broken);
    }

    #[test]
    fn missing_config_gets_an_example() {
        let path = temp_config_path("missing");
        let _ = fs::remove_file(&path);

        let result = Config::load_or_create_example(&path);
        let written = Config::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert!(result.is_err());
        assert_eq!(written, Config::example());
    }

    #[test]
    fn existing_config_is_loaded() {
        let path = temp_config_path("existing");
        Config::save_example(&path).unwrap();

        let loaded = Config::load_or_create_example(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, Config::example());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::from_file("/definitely/not/here/config.toml").is_err());
    }
}
