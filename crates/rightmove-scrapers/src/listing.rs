use crate::heuristics::{parse_agent, parse_date_added, parse_date_reduced, parse_price, trim_up};
use crate::{parse_selector, Document};
use rightmove_core::{ListingRecord, Result, ResultPage};
use scraper::{ElementRef, Selector};
use tracing::debug;

const PROPERTY_CARD_PREFIX: &str = "property-";

mod selector {
    pub const PROPERTY_CARD: &str = r#"[id^="property-"]"#;
    pub const RESULTS_COUNT: &str = "#searchHeader > span";
    pub const LINK: &str = "div > div > div.propertyCard-content > div.propertyCard-section > div.propertyCard-details > a";
    pub const HOUSE_INFO: &str = "div > div > div.propertyCard-content > div.propertyCard-section > div.propertyCard-details > a > h2";
    pub const ADDRESS: &str = "div > div > div.propertyCard-content > div.propertyCard-section > div.propertyCard-details > a > address";
    pub const DATE_AND_AGENT: &str = "div > div > div.propertyCard-content > div.propertyCard-detailsFooter > div.propertyCard-branchSummary";
    pub const PRICE: &str = "div > div > div.propertyCard-header > div > a > div.propertyCard-priceValue";
    pub const FEATURED: &str = "div > div > div.propertyCard-moreInfo > div.propertyCard-moreInfoFeaturedTitle";
    // Pagination is rendered client side, so these rarely match.
    pub const PAGE_COUNT: &str = "#l-container > div.l-propertySearch-paginationWrapper > div > div > div > div.pagination-pageSelect > span:nth-child(4)";
    pub const CURRENT_PAGE: &str = "#l-container > div.l-propertySearch-paginationWrapper > div > div > div > div.pagination-pageSelect > div";
}

struct Selectors {
    property_card: Selector,
    results_count: Selector,
    link: Selector,
    house_info: Selector,
    address: Selector,
    date_and_agent: Selector,
    price: Selector,
    featured: Selector,
    page_count: Selector,
    current_page: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            property_card: parse_selector(selector::PROPERTY_CARD)?,
            results_count: parse_selector(selector::RESULTS_COUNT)?,
            link: parse_selector(selector::LINK)?,
            house_info: parse_selector(selector::HOUSE_INFO)?,
            address: parse_selector(selector::ADDRESS)?,
            date_and_agent: parse_selector(selector::DATE_AND_AGENT)?,
            price: parse_selector(selector::PRICE)?,
            featured: parse_selector(selector::FEATURED)?,
            page_count: parse_selector(selector::PAGE_COUNT)?,
            current_page: parse_selector(selector::CURRENT_PAGE)?,
        })
    }
}

/// Extracts listings and paging metadata from search result pages.
pub struct SearchPageParser {
    selectors: Selectors,
}

impl SearchPageParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: Selectors::new()?,
        })
    }

    /// Pure extraction; a card that cannot be read is skipped without
    /// affecting the rest of the page.
    pub fn parse(&self, document: &Document) -> ResultPage {
        let html = document.parse();
        let s = &self.selectors;

        let page_count = select_text(html.root_element(), &s.page_count)
            .and_then(|t| parse_count(&t))
            .unwrap_or(-1);
        let results_count = select_text(html.root_element(), &s.results_count)
            .and_then(|t| parse_count(&t))
            .unwrap_or(-1);
        let current_page = select_text(html.root_element(), &s.current_page)
            .and_then(|t| parse_count(&t))
            .unwrap_or(-1);

        let listings: Vec<ListingRecord> = html
            .select(&s.property_card)
            .filter_map(|card| self.parse_card(card))
            .collect();

        debug!(
            "Parsed {} listings from {} (results count {})",
            listings.len(),
            document.url(),
            results_count
        );

        ResultPage {
            listings,
            results_count,
            page_count,
            current_page,
            source_url: document.url().to_string(),
        }
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Option<ListingRecord> {
        let s = &self.selectors;
        let card_id = card.value().id().unwrap_or_default();

        let remote_id = match parse_card_id(card_id) {
            Some(id) => id,
            None => {
                debug!("Skipping card with id {:?}", card_id);
                return None;
            }
        };

        let link = match card
            .select(&s.link)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(href) => href.to_string(),
            None => {
                debug!("Skipping listing {} without a link", remote_id);
                return None;
            }
        };

        let house_info = select_text(card, &s.house_info).and_then(|t| trim_up(&t));
        let address = select_text(card, &s.address).and_then(|t| trim_up(&t));
        // The card's description block is not read; description mirrors the address.
        let description = address.clone();

        let (date_added, date_reduced, agent) = match select_text(card, &s.date_and_agent) {
            Some(text) if !text.is_empty() => (
                parse_date_added(&text),
                parse_date_reduced(&text),
                parse_agent(&text),
            ),
            _ => (None, None, None),
        };

        let price = parse_price(&select_text(card, &s.price).unwrap_or_default());

        let featured = select_text(card, &s.featured)
            .map(|t| t.to_lowercase().contains("featured"))
            .unwrap_or(false);

        Some(ListingRecord {
            remote_id,
            link,
            house_info,
            address,
            description,
            agent,
            date_added,
            date_reduced,
            price,
            featured,
            image_urls: Vec::new(),
        })
    }
}

fn select_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// "property-123456" -> 123456. Zero and non-numeric ids are rejected.
fn parse_card_id(id: &str) -> Option<u64> {
    id.strip_prefix(PROPERTY_CARD_PREFIX)?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
}

/// Integer with optional thousands separators, e.g. "1,024".
fn parse_count(text: &str) -> Option<i64> {
    let text = text.trim();
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    text.replace(',', "").parse::<i64>().ok()
}
