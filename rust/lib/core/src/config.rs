use std::path::PathBuf;
use std::time::Duration;

/// Default re-fetch cadence of a TV display, in seconds.
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 10;

/// Default debounce window for conflict recomputation, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Common configuration shared by the server and the display client.
///
/// Each binary parses these from command-line arguments, then passes them
/// to storage initialization and to the layout workers.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the embedded database.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/panels.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,

    /// Fallback polling interval (seconds) when a panel does not set one.
    pub polling_interval: u64,

    /// Debounce window (milliseconds) for conflict recomputation.
    pub debounce_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            listen: "0.0.0.0:8080".to_string(),
            polling_interval: DEFAULT_POLLING_INTERVAL_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from command-line arguments.
    ///
    /// Supported flags:
    /// - `--data-dir=PATH`
    /// - `--db=PATH`
    /// - `--listen=ADDR`
    /// - `--polling-interval=SECS`
    /// - `--debounce-ms=MS`
    ///
    /// Numeric flags that fail to parse keep their defaults.
    pub fn from_args(args: &[String]) -> Self {
        ServiceConfig::default().with_args(args)
    }

    /// Apply `--flag=value` overrides on top of an existing config.
    /// Unknown arguments are ignored.
    pub fn with_args(mut self, args: &[String]) -> Self {
        for arg in args {
            if let Some(val) = arg.strip_prefix("--data-dir=") {
                self.data_dir = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--db=") {
                self.db_path = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--listen=") {
                self.listen = val.to_string();
            } else if let Some(val) = arg.strip_prefix("--polling-interval=") {
                if let Ok(secs) = val.parse() {
                    self.polling_interval = secs;
                }
            } else if let Some(val) = arg.strip_prefix("--debounce-ms=") {
                if let Ok(ms) = val.parse() {
                    self.debounce_ms = ms;
                }
            }
        }
        self
    }

    /// Resolve the redb database path, falling back to `{data_dir}/panels.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("panels.redb"))
    }

    /// Fallback polling interval. Zero means "use the built-in default".
    pub fn polling_interval(&self) -> Duration {
        match self.polling_interval {
            0 => Duration::from_secs(DEFAULT_POLLING_INTERVAL_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
