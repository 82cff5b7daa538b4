//! Infrastructure layer for browser rendering, parsing and file output
//!
//! This module provides the browser session abstraction, page loading,
//! HTML parsing, configuration, logging and CSV writing.

pub mod config; // Configuration loading and defaults
pub mod csv_exporter;
pub mod logging; // Logging infrastructure
pub mod page_loader;
pub mod parsing; // Product card extraction and text normalization
pub mod parsing_error; // Parsing error types
pub mod renderer; // Browser session abstraction

// Re-export commonly used items
pub use config::{AppConfig, BrowserSettings, ConfigError, CrawlConfig, ExportConfig, LoggingConfig};
pub use csv_exporter::CsvExporter;
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use page_loader::{PageLoader, PageLoaderConfig};
pub use parsing::{ParsingConfig, ParsingError, ParsingResult, ProductListParser, TextNormalizer};
pub use renderer::{ChromiumRenderer, PageRenderer, RendererError, RendererResult};
