//! Climate API Core Library
//!
//! Shared utilities for the climate observations service:
//! - Configuration loading (XDG-compliant)
//! - ISO date parsing and trailing-window arithmetic

mod config;
pub mod dates;

pub use config::{find_config_file, get_xdg_config_path, load_config, ConfigSource};
pub use dates::{
    format_iso_date, parse_iso_date, round_hundredths, trailing_year_start, DateError,
    TRAILING_WINDOW_DAYS,
};

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 9810;

/// Default location of the pre-populated observations database
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";

/// Default size of the read-only connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
