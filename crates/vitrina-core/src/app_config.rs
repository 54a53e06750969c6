use std::time::Duration;

/// Waits and settle pauses applied while driving the browser.
///
/// `wait_timeout` bounds every wait-for-condition call. The three settle
/// intervals are unconditional sleeps after UI actions that have no reliably
/// observable completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub wait_timeout: Duration,
    /// Pause after each scroll-to-bottom on infinite-scroll listings.
    pub scroll_settle: Duration,
    /// Pause after scrolling a control into view and before clicking it.
    pub click_settle: Duration,
    /// Pause after a navigation or search submit whose load can't be observed.
    pub page_settle: Duration,
    /// Safety cap on result pages / scroll iterations per enumeration call.
    pub max_pages: usize,
}

impl Pacing {
    /// No settle pauses and a short wait bound; intended for tests that drive
    /// an in-memory browser.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            wait_timeout: Duration::from_millis(50),
            scroll_settle: Duration::ZERO,
            click_settle: Duration::ZERO,
            page_settle: Duration::ZERO,
            max_pages: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub webdriver_url: String,
    pub headless: bool,
    /// Lower bound for the "from year" filter on the used-car search form.
    pub min_year: u16,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub pacing: Pacing,
}
