use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fake::faker::address::en::StreetName;
use fake::faker::company::en::CompanyName;
use fake::Fake;
use rand::Rng;
use rightmove_core::{ListingCollection, ListingRecord, LocationCodes, SearchCriteria, SiteConfig};
use rightmove_scrapers::{Document, DocumentFetcher, RightmoveSearch, SearchPageParser};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

// Helper function to render a search result card with fake content
fn fake_card(id: u64) -> String {
    let street: String = StreetName().fake();
    let agent: String = CompanyName().fake();
    let price = rand::thread_rng().gen_range(50_000..1_000_000);

    format!(
        r#"<div id="property-{id}"><div><div>
            <div class="propertyCard-header"><div><a href="/properties/{id}"><div class="propertyCard-priceValue">£{price}</div></a></div></div>
            <div class="propertyCard-content">
                <div class="propertyCard-section">
                    <div class="propertyCard-details"><a href="/properties/{id}"><h2>2 bedroom flat for sale</h2><address>{id} {street}</address></a></div>
                </div>
                <div class="propertyCard-detailsFooter"><div class="propertyCard-branchSummary">Added on 12/01/2021 by {agent}</div></div>
            </div>
            <div class="propertyCard-moreInfo"></div>
        </div></div></div>"#
    )
}

fn fake_page(results_count: usize, ids: std::ops::Range<u64>) -> String {
    let cards: Vec<String> = ids.map(fake_card).collect();
    format!(
        r#"<html><body><div id="searchHeader"><span>{}</span></div><div id="l-searchResults">{}</div></body></html>"#,
        results_count,
        cards.join("\n")
    )
}

// Helper function to generate fake listings, with `duplicates` of them repeated
fn generate_fake_listings(count: usize, duplicates: usize) -> Vec<ListingRecord> {
    let mut listings: Vec<ListingRecord> = (0..count as u64)
        .map(|id| ListingRecord {
            remote_id: id + 1,
            link: format!("/properties/{}", id + 1),
            address: Some(StreetName().fake()),
            agent: Some(CompanyName().fake()),
            price: rand::thread_rng().gen_range(50_000..1_000_000),
            ..ListingRecord::default()
        })
        .collect();
    let repeated: Vec<ListingRecord> = listings.iter().take(duplicates).cloned().collect();
    listings.extend(repeated);
    listings
}

struct MemoryFetcher {
    pages: HashMap<String, String>,
}

#[async_trait]
impl DocumentFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str, _cancel: &CancellationToken) -> Option<Document> {
        self.pages.get(url).map(|html| Document::new(url, html.clone()))
    }
}

fn memory_site(search_url: &str, page_count: u64) -> MemoryFetcher {
    let results = (page_count * 24) as usize;
    let mut pages = HashMap::new();
    pages.insert(search_url.to_string(), fake_page(results, 0..0));
    for page in 0..page_count {
        let first = page * 24 + 1;
        pages.insert(
            format!("{}&index={}", search_url, page * 24),
            fake_page(results, first..first + 24),
        );
    }
    MemoryFetcher { pages }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    let parser = SearchPageParser::new().unwrap();

    for size in [1u64, 24].iter() {
        let document = Document::new("http://bench/find.html", fake_page(*size as usize, 1..size + 1));
        group.bench_with_input(BenchmarkId::new("result_page", size), size, |b, _| {
            b.iter(|| black_box(parser.parse(&document)));
        });
    }

    group.finish();
}

fn bench_merging(c: &mut Criterion) {
    let mut group = c.benchmark_group("merging");

    for size in [24usize, 240, 1008].iter() {
        let listings = generate_fake_listings(*size, size / 4);
        group.bench_with_input(BenchmarkId::new("add_range", size), size, |b, _| {
            b.iter(|| {
                let mut collection = ListingCollection::new();
                black_box(collection.add_range(listings.clone()));
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    let codes = Arc::new(LocationCodes::bundled().unwrap());
    let criteria = SearchCriteria::outcode("OL6");

    for pages in [1u64, 10, 42].iter() {
        let probe = MemoryFetcher { pages: HashMap::new() };
        let search_url = RightmoveSearch::new(Arc::new(probe), codes.clone(), SiteConfig::default())
            .unwrap()
            .search_url(&criteria)
            .unwrap();
        let search = RightmoveSearch::new(
            Arc::new(memory_site(&search_url, *pages)),
            codes.clone(),
            SiteConfig::default(),
        )
        .unwrap();

        group.bench_with_input(BenchmarkId::new("fan_out", pages), pages, |b, _| {
            b.to_async(&rt).iter(|| async {
                black_box(search.search(&criteria, &CancellationToken::new()).await.unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_merging, bench_search);

criterion_main!(benches);
