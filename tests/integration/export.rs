use crate::common::{card, paged, results_page, StubFetcher, SEARCH_URL};
use rightmove_core::{create_listing_table, export_csv, Location, LocationCodes, SearchCriteria, SiteConfig};
use rightmove_scrapers::RightmoveSearch;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_search_results_export_to_csv() {
    let fetcher = Arc::new(
        StubFetcher::default()
            .page(SEARCH_URL, results_page("2", &[]))
            .page(paged(0), results_page("2", &[card(61, "1 Park Parade"), card(62, "2 Park Parade")])),
    );
    let search = RightmoveSearch::new(fetcher, Arc::new(LocationCodes::bundled().unwrap()), SiteConfig::default()).unwrap();

    let listings = search
        .search(
            &SearchCriteria::unfiltered(Location::Outcode("ol6".to_string())),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listings.csv");
    export_csv(&listings, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "61");
    assert_eq!(&rows[0][3], "1 Park Parade");
    assert_eq!(&rows[1][0], "62");
    assert_eq!(&rows[1][8], "125000");

    let table = create_listing_table(listings.as_slice());
    assert!(table.contains("2 Park Parade"));
    assert!(table.contains("Northwood, Oldham"));
}
