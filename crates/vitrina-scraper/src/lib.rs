pub mod browser;
pub mod client;
pub mod enumerate;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
mod rate_limit;

pub use browser::{BrowserSession, Locator, SelectChoice, WaitCondition, WebDriverSession};
pub use client::{BrowserPages, HttpFetcher, PageSource};
pub use enumerate::{enumerate_paged, enumerate_scroll, listings, Enumeration};
pub use error::ScraperError;
pub use fetch::{fetch_details, FetchBatch, FetchFailure, ItemGap};
pub use normalize::{normalize_records, NormalizeError, NormalizedTable};
