use serde::{Deserialize, Serialize};

use crate::storage::Series;
use crate::storage::keys::Category;

/// What the request parser learned about a visitor
///
/// Produced upstream from GeoIP and User-Agent parsing; this crate only
/// consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorContext {
    /// ISO 3166-1 alpha-2 country code, when resolvable
    pub country: Option<String>,
    pub is_bot: bool,
    pub browser: Option<String>,
    pub browser_version: Option<String>,
    pub os: Option<String>,
}

impl VisitorContext {
    pub fn bot() -> Self {
        Self {
            is_bot: true,
            ..Self::default()
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = Some(browser.into());
        self
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    /// Category series this visit counts towards.
    ///
    /// Country needs a known value; browser and OS are skipped for bots.
    /// Browser counters are keyed by name only, the version is ignored.
    pub fn category_series(&self) -> Vec<Series> {
        let mut series = Vec::with_capacity(3);

        if let Some(country) = known(&self.country) {
            series.push(Series::Category(Category::Country, country));
        }

        if !self.is_bot {
            if let Some(browser) = known(&self.browser) {
                series.push(Series::Category(Category::Browser, browser));
            }
            if let Some(os) = known(&self.os) {
                series.push(Series::Category(Category::Os, os));
            }
        }

        series
    }
}

fn known(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
