use crate::heuristics::{parse_date_added, parse_date_reduced, parse_price, trim_up};
use crate::{fetch_document, parse_selector, Document, DocumentFetcher};
use rightmove_core::{ListingRecord, Result, RightmoveError, SiteConfig, PRICE_NOT_SET};
use scraper::Selector;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const PAGE_MODEL_MARKER: &str = "window.PAGE_MODEL";
const PAGE_MODEL_ASSIGNMENT: &str = "window.PAGE_MODEL = ";

// Only the fields we map. Everything is optional because the payload is
// not under our control; unknown fields are ignored.

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PageModel {
    property_data: Option<PropertyData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PropertyData {
    address: Option<Address>,
    text: Option<Text>,
    customer: Option<Customer>,
    prices: Option<Prices>,
    listing_history: Option<ListingHistory>,
    images: Option<Vec<Image>>,
    property_sub_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Address {
    display_address: Option<String>,
    uk_country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Text {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Customer {
    branch_display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Prices {
    primary_price: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ListingHistory {
    listing_update_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Image {
    url: Option<String>,
}

/// Reads a listing's detail page, whose data is embedded as a JSON object
/// assigned to `window.PAGE_MODEL` in a script element.
pub struct PropertyPageParser {
    fetcher: Arc<dyn DocumentFetcher>,
    site: SiteConfig,
    script: Selector,
}

impl PropertyPageParser {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, site: SiteConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            site,
            script: parse_selector("script")?,
        })
    }

    /// Fetches `/properties/{id}` and extracts the listing.
    pub async fn parse_property(&self, id: u64, cancel: &CancellationToken) -> Result<ListingRecord> {
        let url = self.site.property_url(id);
        info!("Fetching property page: {}", url);

        let document = fetch_document(self.fetcher.as_ref(), &url, cancel)
            .await?
            .ok_or_else(|| RightmoveError::FetchFailed(url.clone()))?;

        self.parse(&document, id)
            .ok_or_else(|| RightmoveError::Payload(format!("no {} payload in {}", PAGE_MODEL_MARKER, url)))
    }

    /// `None` when the page has no readable payload.
    pub fn parse(&self, document: &Document, id: u64) -> Option<ListingRecord> {
        let model = self.page_model(document)?;
        let data = match model.property_data {
            Some(data) => data,
            None => {
                warn!("Payload in {} has no propertyData", document.url());
                return None;
            }
        };

        let address = data.address.and_then(|a| {
            let parts: Vec<String> = [a.display_address, a.uk_country]
                .into_iter()
                .flatten()
                .filter_map(|part| trim_up(&part))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        });

        let price = data
            .prices
            .and_then(|p| p.primary_price)
            .map(|p| parse_price(&p))
            .unwrap_or(PRICE_NOT_SET);

        let update_reason = data
            .listing_history
            .and_then(|h| h.listing_update_reason)
            .unwrap_or_default();

        let image_urls = data
            .images
            .unwrap_or_default()
            .into_iter()
            .filter_map(|image| image.url)
            .collect();

        Some(ListingRecord {
            remote_id: id,
            link: SiteConfig::property_link(id),
            house_info: data.property_sub_type.and_then(|t| trim_up(&t)),
            address,
            description: data.text.and_then(|t| t.description),
            agent: data.customer.and_then(|c| c.branch_display_name),
            date_added: parse_date_added(&update_reason),
            date_reduced: parse_date_reduced(&update_reason),
            price,
            featured: false,
            image_urls,
        })
    }

    fn page_model(&self, document: &Document) -> Option<PageModel> {
        let html = document.parse();
        let script_text = html
            .select(&self.script)
            .map(|script| script.text().collect::<String>())
            .find(|text| text.trim().starts_with(PAGE_MODEL_MARKER))?;

        let text = script_text.trim();
        let start = text.find(PAGE_MODEL_ASSIGNMENT)? + PAGE_MODEL_ASSIGNMENT.len();

        // The object may be followed by a semicolon or further statements.
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<PageModel>();
        match stream.next() {
            Some(Ok(model)) => Some(model),
            Some(Err(e)) => {
                warn!("Failed to parse page model in {}: {}", document.url(), e);
                None
            }
            None => {
                debug!("Empty page model in {}", document.url());
                None
            }
        }
    }
}
