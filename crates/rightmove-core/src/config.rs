use crate::Result;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.rightmove.co.uk";
pub const SEARCH_PATH: &str = "/property-for-sale/find.html";
/// Listings shown per result page; also the step of the `index` parameter.
pub const RESULTS_PER_PAGE: u32 = 24;
/// The site refuses to page beyond this many result pages.
pub const MAX_PAGE_COUNT: u32 = 42;

/// Where the site lives and how its result set is paged.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: String,
    pub results_per_page: u32,
    pub max_page_count: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            results_per_page: RESULTS_PER_PAGE,
            max_page_count: MAX_PAGE_COUNT,
        }
    }
}

impl SiteConfig {
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?.to_string(),
            ..Self::default()
        })
    }

    /// Search URL carrying an already encoded query string.
    pub fn search_url(&self, query: &str) -> String {
        format!("{}{}?{}", self.origin(), SEARCH_PATH, query)
    }

    /// Search URL for the result page starting at `index`.
    pub fn paged_search_url(&self, search_url: &str, index: u32) -> String {
        format!("{}&index={}", search_url, index)
    }

    /// Relative link of a listing's detail page.
    pub fn property_link(id: u64) -> String {
        format!("/properties/{}", id)
    }

    pub fn property_url(&self, id: u64) -> String {
        self.absolute(&Self::property_link(id))
    }

    /// Joins a site-relative link onto the base URL.
    pub fn absolute(&self, link: &str) -> String {
        format!("{}{}", self.origin(), link)
    }

    /// Number of result pages for `results_count` listings, capped at
    /// `max_page_count`. A negative count means the site did not report one.
    pub fn page_count(&self, results_count: i64) -> u32 {
        let pages = if results_count >= 0 {
            let per_page = i64::from(self.results_per_page.max(1));
            let rem = i64::from(results_count % per_page != 0);
            (results_count / per_page + rem) as u64
        } else {
            1
        };

        pages.min(u64::from(self.max_page_count)) as u32
    }

    fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
