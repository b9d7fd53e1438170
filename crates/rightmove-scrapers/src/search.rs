use crate::listing::SearchPageParser;
use crate::{fetch_document, DocumentFetcher};
use futures::future::join_all;
use rightmove_core::{
    ListingCollection, LocationCodes, QueryEncoder, Result, ResultPage, RightmoveError,
    SearchCriteria, SiteConfig,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs a full search: discovers the page count from the first result page,
/// fetches every page concurrently and merges the listings in page order.
pub struct RightmoveSearch {
    fetcher: Arc<dyn DocumentFetcher>,
    codes: Arc<LocationCodes>,
    site: SiteConfig,
    parser: SearchPageParser,
}

impl RightmoveSearch {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        codes: Arc<LocationCodes>,
        site: SiteConfig,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            codes,
            site,
            parser: SearchPageParser::new()?,
        })
    }

    /// Search URL for `criteria`, without a paging index.
    pub fn search_url(&self, criteria: &SearchCriteria) -> Result<String> {
        let query = QueryEncoder::new(&self.codes).encode(criteria)?;
        Ok(self.site.search_url(&query))
    }

    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        cancel: &CancellationToken,
    ) -> Result<ListingCollection> {
        let search_url = self.search_url(criteria)?;
        info!("Searching: {}", search_url);

        // Discovery: only this fetch is fatal.
        let first_page = self
            .fetch_page(&search_url, cancel)
            .await?
            .ok_or_else(|| RightmoveError::FetchFailed(search_url.clone()))?;

        let page_count = self.page_count(&first_page);
        info!("Page count: {}", page_count);

        let urls: Vec<String> = (0..page_count)
            .map(|page| {
                self.site
                    .paged_search_url(&search_url, page * self.site.results_per_page)
            })
            .collect();

        // The discovery page is fetched again as index 0.
        let pages = join_all(urls.iter().map(|url| self.fetch_page(url, cancel))).await;

        if cancel.is_cancelled() {
            info!("Search cancelled after fetching {} pages", pages.len());
            return Err(RightmoveError::Cancelled);
        }

        let mut listings = ListingCollection::new();
        for (url, page) in urls.iter().zip(pages) {
            match page {
                Ok(Some(page)) => {
                    let found = page.listings.len();
                    let added = listings.add_range(page.listings);
                    debug!("{}: {} listings, {} new", url, found, added);
                }
                Ok(None) => warn!("Skipping page {}: no document", url),
                Err(e) => warn!("Skipping page {}: {}", url, e),
            }
        }

        info!("Search complete: {} unique listings", listings.len());
        Ok(listings)
    }

    fn page_count(&self, first_page: &ResultPage) -> u32 {
        let page_count = self.site.page_count(first_page.results_count);
        if first_page.results_count >= 0
            && i64::from(page_count) * i64::from(self.site.results_per_page) < first_page.results_count
        {
            info!(
                "Capped page count to {} ({} results reported)",
                page_count, first_page.results_count
            );
        }
        page_count
    }

    async fn fetch_page(&self, url: &str, cancel: &CancellationToken) -> Result<Option<ResultPage>> {
        let document = fetch_document(self.fetcher.as_ref(), url, cancel).await?;
        Ok(document.map(|document| self.parser.parse(&document)))
    }
}
