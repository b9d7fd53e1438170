use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

mod codes;
mod collection;
mod config;
mod criteria;
mod display;
mod error;
mod query;

pub use codes::LocationCodes;
pub use collection::ListingCollection;
pub use config::{SiteConfig, DEFAULT_BASE_URL, MAX_PAGE_COUNT, RESULTS_PER_PAGE, SEARCH_PATH};
pub use criteria::{
    Location, PropertyType, Radius, SearchCriteria, SortType, ALLOWED_PRICES, ALLOWED_RADIUS_VALUES,
};
pub use display::{create_listing_table, export_csv, write_csv, ListingTableRow};
pub use error::{Result, RightmoveError};
pub use query::QueryEncoder;

/// Price sentinel for listings whose price text could not be parsed.
pub const PRICE_NOT_SET: i64 = -1;

/// One property advertisement.
///
/// Equality is business identity: link, house info, address, description and
/// agent compared case-insensitively, date added and price compared exactly.
/// `featured`, `remote_id`, `date_reduced` and the images take no part in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub remote_id: u64,
    pub link: String,
    pub house_info: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub agent: Option<String>,
    /// `None` when the listing text carried no parseable date.
    pub date_added: Option<NaiveDate>,
    pub date_reduced: Option<NaiveDate>,
    pub price: i64,
    pub featured: bool,
    pub image_urls: Vec<String>,
}

impl Default for ListingRecord {
    fn default() -> Self {
        Self {
            remote_id: 0,
            link: String::new(),
            house_info: None,
            address: None,
            description: None,
            agent: None,
            date_added: None,
            date_reduced: None,
            price: PRICE_NOT_SET,
            featured: false,
            image_urls: Vec::new(),
        }
    }
}

impl ListingRecord {
    /// Absolute URL of the listing, if it has a link.
    pub fn url(&self, site: &SiteConfig) -> Option<String> {
        if self.link.is_empty() {
            None
        } else {
            Some(site.absolute(&self.link))
        }
    }

    pub fn has_price(&self) -> bool {
        self.price != PRICE_NOT_SET
    }

    pub fn image_url(&self, index: usize) -> Option<&str> {
        self.image_urls.get(index).map(String::as_str)
    }

    pub(crate) fn identity(&self) -> ListingIdentity {
        ListingIdentity {
            link: self.link.to_lowercase(),
            house_info: fold(&self.house_info),
            address: fold(&self.address),
            description: fold(&self.description),
            agent: fold(&self.agent),
            date_added: self.date_added,
            price: self.price,
        }
    }
}

fn fold(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| v.to_lowercase())
}

/// Case-folded projection of the fields that make up a listing's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ListingIdentity {
    link: String,
    house_info: Option<String>,
    address: Option<String>,
    description: Option<String>,
    agent: Option<String>,
    date_added: Option<NaiveDate>,
    price: i64,
}

impl PartialEq for ListingRecord {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for ListingRecord {}

impl Hash for ListingRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl std::fmt::Display for ListingRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Id: {}", self.remote_id)?;
        writeln!(f, "House info: {}", self.house_info.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "Address: {}", self.address.as_deref().unwrap_or("N/A"))?;
        if self.has_price() {
            writeln!(f, "Price: £{}", self.price)?;
        } else {
            writeln!(f, "Price: N/A")?;
        }
        writeln!(f, "Agent: {}", self.agent.as_deref().unwrap_or("N/A"))?;
        writeln!(f, "Date added: {}", format_date(self.date_added))?;
        writeln!(f, "Date reduced: {}", format_date(self.date_reduced))?;
        write!(f, "Link: {}", self.link)
    }
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Listings and page metadata extracted from one search result page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPage {
    pub listings: Vec<ListingRecord>,
    /// Total across all pages as reported by the site, -1 when absent.
    pub results_count: i64,
    pub page_count: i64,
    pub current_page: i64,
    pub source_url: String,
}
