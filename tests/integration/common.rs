use async_trait::async_trait;
use rightmove_scrapers::{Document, DocumentFetcher};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const SEARCH_URL: &str =
    "https://www.rightmove.co.uk/property-for-sale/find.html?locationIdentifier=OUTCODE%5E1870&sortType=6";

pub fn paged(index: u32) -> String {
    format!("{}&index={}", SEARCH_URL, index)
}

/// Serves canned pages. Later pages can be delayed so they complete before
/// earlier ones.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, (String, Duration)>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), (html.into(), Duration::ZERO));
        self
    }

    pub fn slow_page(mut self, url: impl Into<String>, html: impl Into<String>, delay: Duration) -> Self {
        self.pages.insert(url.into(), (html.into(), delay));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, url: &str, _cancel: &CancellationToken) -> Option<Document> {
        self.requests.lock().unwrap().push(url.to_string());
        let (html, delay) = self.pages.get(url)?.clone();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Some(Document::new(url, html))
    }
}

pub struct Card<'a> {
    pub id: &'a str,
    pub link: &'a str,
    pub house_info: &'a str,
    pub address: &'a str,
    pub branch: &'a str,
    pub price: &'a str,
    pub featured: bool,
}

impl Card<'_> {
    pub fn html(&self) -> String {
        let featured = if self.featured { "Featured Property" } else { "" };
        format!(
            r#"<div class="l-searchResult is-list" id="{id}">
  <div class="propertyCard">
    <div class="propertyCard-wrapper">
      <div class="propertyCard-header">
        <div class="propertyCard-price">
          <a class="propertyCard-priceLink" href="{link}">
            <div class="propertyCard-priceValue">
              {price}
            </div>
          </a>
        </div>
      </div>
      <div class="propertyCard-content">
        <div class="propertyCard-section">
          <div class="propertyCard-details">
            <a class="propertyCard-link" href="{link}">
              <h2 class="propertyCard-title">
                {house_info}
              </h2>
              <address class="propertyCard-address">
                <meta content="{address}">
                <span>{address}</span>
              </address>
            </a>
          </div>
          <div class="propertyCard-description">
            <span>Spacious home close to local amenities.</span>
          </div>
        </div>
        <div class="propertyCard-detailsFooter">
          <div class="propertyCard-branchSummary">
            {branch}
          </div>
        </div>
      </div>
      <div class="propertyCard-moreInfo">
        <div class="propertyCard-moreInfoFeaturedTitle">{featured}</div>
      </div>
    </div>
  </div>
</div>"#,
            id = self.id,
            link = self.link,
            price = self.price,
            house_info = self.house_info,
            address = self.address,
            branch = self.branch,
            featured = featured,
        )
    }
}

pub fn card(id: u64, address: &str) -> String {
    Card {
        id: &format!("property-{}", id),
        link: &format!("/properties/{}#/", id),
        house_info: "2 bedroom terraced house for sale",
        address,
        branch: "Added on 12/01/2021 by Northwood, Oldham",
        price: "£125,000",
        featured: false,
    }
    .html()
}

pub fn results_page(results_count: &str, cards: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Properties For Sale in OL6</title></head>
<body>
  <div id="searchHeader" class="searchHeader"><span class="searchHeader-resultCount">{}</span> results</div>
  <div id="l-container">
    <div id="l-searchResults">
      <div class="l-searchResult is-hidden" id="property-0"></div>
      {}
    </div>
  </div>
</body>
</html>"#,
        results_count,
        cards.join("\n")
    )
}
