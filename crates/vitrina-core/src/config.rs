use std::str::FromStr;
use std::time::Duration;

use crate::app_config::{AppConfig, Pacing};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// configuration pointing at a local chromedriver.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let log_level = or_default("VITRINA_LOG_LEVEL", "info");
    let webdriver_url = or_default("VITRINA_WEBDRIVER_URL", "http://localhost:9515");
    let headless = parse_bool("VITRINA_HEADLESS", &or_default("VITRINA_HEADLESS", "true"))?;

    let min_year: u16 = parse_number("VITRINA_MIN_YEAR", &or_default("VITRINA_MIN_YEAR", "2020"))?;
    let request_timeout_secs = parse_number(
        "VITRINA_REQUEST_TIMEOUT_SECS",
        &or_default("VITRINA_REQUEST_TIMEOUT_SECS", "30"),
    )?;
    let user_agent = or_default("VITRINA_USER_AGENT", "vitrina/0.1 (listing-analytics)");
    let max_retries = parse_number("VITRINA_MAX_RETRIES", &or_default("VITRINA_MAX_RETRIES", "3"))?;
    let retry_backoff_base_secs = parse_number(
        "VITRINA_RETRY_BACKOFF_BASE_SECS",
        &or_default("VITRINA_RETRY_BACKOFF_BASE_SECS", "2"),
    )?;

    let wait_timeout_secs: u64 = parse_number(
        "VITRINA_WAIT_TIMEOUT_SECS",
        &or_default("VITRINA_WAIT_TIMEOUT_SECS", "10"),
    )?;
    let scroll_settle_ms: u64 = parse_number(
        "VITRINA_SCROLL_SETTLE_MS",
        &or_default("VITRINA_SCROLL_SETTLE_MS", "5000"),
    )?;
    let click_settle_ms: u64 = parse_number(
        "VITRINA_CLICK_SETTLE_MS",
        &or_default("VITRINA_CLICK_SETTLE_MS", "1000"),
    )?;
    let page_settle_ms: u64 = parse_number(
        "VITRINA_PAGE_SETTLE_MS",
        &or_default("VITRINA_PAGE_SETTLE_MS", "3000"),
    )?;
    let max_pages: usize =
        parse_number("VITRINA_MAX_PAGES", &or_default("VITRINA_MAX_PAGES", "500"))?;
    if max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VITRINA_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        webdriver_url,
        headless,
        min_year,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        pacing: Pacing {
            wait_timeout: Duration::from_secs(wait_timeout_secs),
            scroll_settle: Duration::from_millis(scroll_settle_ms),
            click_settle: Duration::from_millis(click_settle_ms),
            page_settle: Duration::from_millis(page_settle_ms),
            max_pages,
        },
    })
}

fn parse_number<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
