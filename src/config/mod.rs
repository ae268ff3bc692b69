//! Configuration module for the SheetGenie backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the completion service
    pub openai_api_key: String,
    /// API key for the document service
    pub smartsheet_api_key: String,
    /// Base URL of the completion service
    pub openai_base_url: String,
    /// Base URL of the document service
    pub smartsheet_base_url: String,
    /// Completion model identifier
    pub model: String,
    /// Rows per delete/insert batch against the document service
    pub row_batch_size: usize,
    /// Pause between consecutive batches (rate-limit compliance)
    pub batch_pause: Duration,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let smartsheet_api_key = env::var("SMARTSHEET_API_KEY").unwrap_or_default();

        let openai_base_url = env::var("SHEETGENIE_OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());

        let smartsheet_base_url = env::var("SHEETGENIE_SMARTSHEET_BASE_URL")
            .unwrap_or_else(|_| "https://api.smartsheet.com/2.0".to_string());

        let model = env::var("SHEETGENIE_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        let row_batch_size = env::var("SHEETGENIE_ROW_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(100);

        let batch_pause_ms = env::var("SHEETGENIE_BATCH_PAUSE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        let bind_addr = env::var("SHEETGENIE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid SHEETGENIE_BIND_ADDR format");

        let log_level = env::var("SHEETGENIE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            openai_api_key,
            smartsheet_api_key,
            openai_base_url,
            smartsheet_base_url,
            model,
            row_batch_size,
            batch_pause: Duration::from_millis(batch_pause_ms),
            bind_addr,
            log_level,
        }
    }
}
