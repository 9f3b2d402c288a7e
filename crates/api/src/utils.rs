use clap::Parser;
use climate_api_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_API_PORT, DEFAULT_DATABASE_PATH,
    DEFAULT_MAX_CONNECTIONS,
};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Climate API - Read-only station precipitation and temperature reporting"
)]
pub struct Cli {
    /// TOML config file; otherwise $CLIMATE_API_CONFIG, ./climate-api.toml,
    /// the XDG config dir, then /etc/climate-api/
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, env = "CLIMATE_API_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<String>,

    /// Public URL used for links on the index page
    #[arg(short, long, env = "CLIMATE_API_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Path to the pre-populated SQLite observations database (opened read-only)
    #[arg(short, long, env = "CLIMATE_API_DATABASE")]
    #[serde(alias = "database_path")]
    pub database: Option<String>,

    /// Maximum number of pooled read connections
    #[arg(short, long, env = "CLIMATE_API_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn remote_url(&self) -> String {
        self.remote_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host(), self.port()))
    }

    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Values set here win over `file_config`
    pub fn merge(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            domain: self.domain.or(file_config.domain),
            port: self.port.or(file_config.port),
            remote_url: self.remote_url.or(file_config.remote_url),
            database: self.database.or(file_config.database),
            max_connections: self.max_connections.or(file_config.max_connections),
        }
    }
}

/// CLI args and env vars merged over the discovered config file
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = cli_args.config.as_ref().map_or_else(
        || find_config_file("CLIMATE_API_CONFIG", "climate-api.toml"),
        |path| ConfigSource::Explicit(path.into()),
    );

    // The logger is not installed yet, so report on stderr directly
    let file_config: Cli = match load_config(&source) {
        Ok(config) => {
            if let Some(path) = source.path() {
                eprintln!("Loaded config from: {}", path.display());
            }
            config
        }
        Err(e) => {
            eprintln!("Ignoring config file {}: {:#}", source, e);
            Cli::default()
        }
    };

    cli_args.merge(file_config)
}

/// `--level`, then `RUST_LOG`; unknown names fall back to info.
pub fn get_log_level(cli: &Cli) -> LevelFilter {
    cli.level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
