//! Configuration infrastructure
//!
//! Contains configuration loading and validation for storefront crawling.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults (`defaults` module)
//! 2. Optional TOML file (`storefront.toml` in the working directory, or an explicit path)
//! 3. Environment variables prefixed with `STOREFRONT_`, nested keys separated by `__`
//!    (e.g. `STOREFRONT_CRAWL__MAX_PAGES=5`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::parsing::{NormalizationConfig, ParsingConfig, ProductListSelectors};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page traversal and timing
    pub crawl: CrawlConfig,

    /// Browser session settings
    pub browser: BrowserSettings,

    /// Product list selectors
    pub selectors: ProductListSelectors,

    /// Text normalization of scraped values
    pub normalization: NormalizationConfig,

    /// Output file settings
    pub export: ExportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Page traversal and timing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum pages to crawl; `None` means no limit
    pub max_pages: Option<u32>,

    /// How long to wait for the product container marker after navigation
    pub wait_timeout_secs: u64,

    /// Poll interval while waiting for the marker
    pub element_poll_ms: u64,

    /// Pause after each scroll to let lazy content load
    pub scroll_pause_ms: u64,

    /// Upper bound on scroll rounds; reaching it stops scrolling without failing
    pub max_scroll_rounds: u32,

    /// Pause after scrolling back to the top
    pub top_pause_ms: u64,

    /// Extra settle time before reading the final HTML
    pub settle_delay_ms: u64,

    /// Delay between pages to be respectful to the server
    pub page_delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            wait_timeout_secs: defaults::WAIT_TIMEOUT_SECONDS,
            element_poll_ms: defaults::ELEMENT_POLL_MS,
            scroll_pause_ms: defaults::SCROLL_PAUSE_MS,
            max_scroll_rounds: defaults::MAX_SCROLL_ROUNDS,
            top_pause_ms: defaults::TOP_PAUSE_MS,
            settle_delay_ms: defaults::SETTLE_DELAY_MS,
            page_delay_ms: defaults::PAGE_DELAY_MS,
        }
    }
}

impl CrawlConfig {
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub const fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Browser session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a visible window
    pub headless: bool,

    /// Explicit Chrome/Chromium executable; auto-detected when unset
    pub executable: Option<PathBuf>,

    pub window_width: u32,
    pub window_height: u32,

    /// Additional command line switches passed to the browser
    pub extra_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            window_width: defaults::WINDOW_WIDTH,
            window_height: defaults::WINDOW_HEIGHT,
            extra_args: Vec::new(),
        }
    }
}

/// Output file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: PathBuf,
    pub delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(defaults::OUTPUT_FILE),
            delimiter: defaults::DELIMITER,
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Log file name inside `log_dir`
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// With `path = None` a `storefront.toml` in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match path {
            Some(path) => config::File::from(path.to_path_buf()).required(true),
            None => config::File::with_name(defaults::CONFIG_FILE_STEM).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;

        info!("Configuration loaded (max_pages: {:?})", config.crawl.max_pages);
        Ok(config)
    }

    /// Reject settings that would make a run meaningless or hang
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawl.wait_timeout_secs == 0 {
            return Err(validation("crawl.wait_timeout_secs must be greater than 0"));
        }

        if self.crawl.max_scroll_rounds == 0 {
            return Err(validation("crawl.max_scroll_rounds must be greater than 0"));
        }

        if self.crawl.max_pages == Some(0) {
            return Err(validation("crawl.max_pages must be greater than 0 when set"));
        }

        if self.selectors.product_container.trim().is_empty() {
            return Err(validation("selectors.product_container must not be empty"));
        }

        if self.selectors.next_page.trim().is_empty() {
            return Err(validation("selectors.next_page must not be empty"));
        }

        for (name, chain) in [
            ("name", &self.selectors.name),
            ("price", &self.selectors.price),
            ("sales", &self.selectors.sales),
        ] {
            if chain.is_empty() {
                return Err(validation(&format!("selectors.{name} needs at least one strategy")));
            }
        }

        if !self.export.delimiter.is_ascii() {
            return Err(validation("export.delimiter must be a single ASCII character"));
        }

        Ok(())
    }

    /// Parsing configuration view used to build the product list parser
    pub fn parsing_config(&self) -> ParsingConfig {
        ParsingConfig {
            product_list_selectors: self.selectors.clone(),
            normalization: self.normalization.clone(),
        }
    }
}

fn validation(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_string(),
    }
}

/// Default configuration values
pub mod defaults {
    /// Config file looked up in the working directory (any supported extension)
    pub const CONFIG_FILE_STEM: &str = "storefront";

    /// Environment variable prefix
    pub const ENV_PREFIX: &str = "STOREFRONT";

    /// Wait for the product container marker (seconds)
    pub const WAIT_TIMEOUT_SECONDS: u64 = 10;

    /// Marker poll interval (milliseconds)
    pub const ELEMENT_POLL_MS: u64 = 250;

    /// Pause after each scroll (milliseconds)
    pub const SCROLL_PAUSE_MS: u64 = 2000;

    /// Scroll rounds before giving up on height stabilizing
    pub const MAX_SCROLL_ROUNDS: u32 = 50;

    /// Pause after scrolling back to the top (milliseconds)
    pub const TOP_PAUSE_MS: u64 = 1000;

    /// Settle time before reading the page source (milliseconds)
    pub const SETTLE_DELAY_MS: u64 = 3000;

    /// Delay between pages (milliseconds)
    pub const PAGE_DELAY_MS: u64 = 3000;

    pub const WINDOW_WIDTH: u32 = 1920;
    pub const WINDOW_HEIGHT: u32 = 1080;

    pub const OUTPUT_FILE: &str = "tokopedia_products.csv";
    pub const DELIMITER: char = ',';

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "storefront-crawler.log";
}
