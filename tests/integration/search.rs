use crate::common::{card, paged, results_page, StubFetcher, SEARCH_URL};
use rightmove_core::{Location, LocationCodes, RightmoveError, SearchCriteria, SiteConfig};
use rightmove_scrapers::RightmoveSearch;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn criteria() -> SearchCriteria {
    SearchCriteria::unfiltered(Location::Outcode("OL6".to_string()))
}

fn search(fetcher: Arc<StubFetcher>) -> RightmoveSearch {
    let codes = Arc::new(LocationCodes::bundled().unwrap());
    RightmoveSearch::new(fetcher, codes, SiteConfig::default()).unwrap()
}

async fn ids(fetcher: Arc<StubFetcher>) -> Vec<u64> {
    search(fetcher)
        .search(&criteria(), &CancellationToken::new())
        .await
        .unwrap()
        .iter()
        .map(|listing| listing.remote_id)
        .collect()
}

#[tokio::test]
async fn test_search_url_uses_bundled_outcode() {
    let search = search(Arc::new(StubFetcher::default()));
    assert_eq!(search.search_url(&criteria()).unwrap(), SEARCH_URL);
}

#[tokio::test]
async fn test_search_merges_pages_in_order() {
    let fetcher = Arc::new(
        StubFetcher::default()
            .page(SEARCH_URL, results_page("50", &[]))
            .slow_page(
                paged(0),
                results_page("50", &[card(11, "1 Mossley Road"), card(12, "2 Mossley Road")]),
                Duration::from_millis(50),
            )
            .page(paged(24), results_page("50", &[card(13, "3 Mossley Road")]))
            .page(paged(48), results_page("50", &[card(14, "4 Mossley Road")])),
    );

    assert_eq!(ids(fetcher.clone()).await, vec![11, 12, 13, 14]);
    assert_eq!(fetcher.requests().len(), 4);
}

#[tokio::test]
async fn test_search_skips_failed_middle_page() {
    let fetcher = Arc::new(
        StubFetcher::default()
            .page(SEARCH_URL, results_page("50", &[]))
            .page(paged(0), results_page("50", &[card(21, "1 Market Street")]))
            .page(paged(48), results_page("50", &[card(23, "3 Market Street")])),
    );

    assert_eq!(ids(fetcher.clone()).await, vec![21, 23]);

    let requests = fetcher.requests();
    assert!(requests.contains(&paged(24)));
}

#[tokio::test]
async fn test_search_drops_repeated_listings() {
    // 31 is repeated verbatim on the second page; 32 differs only in case.
    let fetcher = Arc::new(
        StubFetcher::default()
            .page(SEARCH_URL, results_page("25", &[]))
            .page(paged(0), results_page("25", &[card(31, "1 Union Street"), card(32, "2 Union Street")]))
            .page(
                paged(24),
                results_page("25", &[card(31, "1 Union Street"), card(32, "2 UNION STREET"), card(33, "3 Union Street")]),
            ),
    );

    assert_eq!(ids(fetcher).await, vec![31, 32, 33]);
}

#[tokio::test]
async fn test_search_reads_card_fields() {
    let fetcher = Arc::new(
        StubFetcher::default()
            .page(SEARCH_URL, results_page("1", &[]))
            .page(paged(0), results_page("1", &[card(41, "7 Stamford Street, Ashton-under-Lyne")])),
    );

    let listings = search(fetcher)
        .search(&criteria(), &CancellationToken::new())
        .await
        .unwrap();

    let listing = listings.iter().next().unwrap();
    assert_eq!(listing.link, "/properties/41#/");
    assert_eq!(listing.house_info.as_deref(), Some("2 bedroom terraced house for sale"));
    assert_eq!(listing.address.as_deref(), Some("7 Stamford Street, Ashton-under-Lyne"));
    assert_eq!(listing.description, listing.address);
    assert_eq!(listing.agent.as_deref(), Some("Northwood, Oldham"));
    assert_eq!(listing.date_added, chrono::NaiveDate::from_ymd_opt(2021, 1, 12));
    assert_eq!(listing.price, 125_000);
    assert!(!listing.featured);
}

#[tokio::test]
async fn test_search_with_unreachable_site_fails() {
    let err = search(Arc::new(StubFetcher::default()))
        .search(&criteria(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RightmoveError::FetchFailed(url) if url == SEARCH_URL));
}

#[tokio::test]
async fn test_search_with_unknown_region_fails() {
    let fetcher = Arc::new(StubFetcher::default());
    let err = search(fetcher.clone())
        .search(&SearchCriteria::region("Atlantis"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RightmoveError::InvalidConfiguration(_)));
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_search_cancelled_mid_flight() {
    let fetcher = Arc::new(
        StubFetcher::default()
            .page(SEARCH_URL, results_page("50", &[]))
            .slow_page(paged(0), results_page("50", &[card(51, "Slow Lane")]), Duration::from_secs(5))
            .slow_page(paged(24), results_page("50", &[card(52, "Slow Lane")]), Duration::from_secs(5))
            .slow_page(paged(48), results_page("50", &[card(53, "Slow Lane")]), Duration::from_secs(5)),
    );
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = search(fetcher).search(&criteria(), &cancel).await.unwrap_err();
    assert!(err.is_cancelled());
}
