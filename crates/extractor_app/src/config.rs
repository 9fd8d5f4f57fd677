use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use engine_logging::{LevelFilter, LogDestination, LogSettings};
use extractor_engine::{EngineSettings, RenderSettings, StaticFetchSettings};

/// Selector-based web value extraction service.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// off, error, warn, info, debug or trace.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// Also write logs to this file (truncated on start).
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Whole-request budget for a static fetch.
    #[arg(long, env = "STATIC_TIMEOUT_SECS", default_value_t = 15)]
    pub static_timeout_secs: u64,

    /// Upper bound on browser navigation.
    #[arg(long, env = "NAVIGATION_TIMEOUT_SECS", default_value_t = 30)]
    pub navigation_timeout_secs: u64,

    /// Pause after the selector wait, for late async rendering.
    #[arg(long, env = "SETTLE_MILLIS", default_value_t = 2000)]
    pub settle_millis: u64,

    /// Chrome/Chromium binary; located automatically when unset.
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn log_settings(&self) -> LogSettings {
        let destination = match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        };
        LogSettings {
            level: self.log_level,
            destination,
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            static_fetch: StaticFetchSettings {
                request_timeout: Duration::from_secs(self.static_timeout_secs),
                ..StaticFetchSettings::default()
            },
            render: RenderSettings {
                navigation_timeout: Duration::from_secs(self.navigation_timeout_secs),
                settle_delay: Duration::from_millis(self.settle_millis),
                chrome_executable: self.chrome_path.clone(),
                ..RenderSettings::default()
            },
        }
    }
}
