use crate::{format_date, ListingCollection, ListingRecord, Result};
use std::io::Write;
use std::path::Path;
use tabled::settings::{object::Columns, Modify, Style, Width};
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct ListingTableRow {
    #[tabled(rename = "Id")]
    pub id: u64,
    #[tabled(rename = "Price", display_with = "display_right_10")]
    pub price: String,
    #[tabled(rename = "Type")]
    pub house_info: String,
    #[tabled(rename = "Added", display_with = "display_right_10")]
    pub date_added: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Agent")]
    pub agent: String,
}

fn display_right_10(s: &str) -> String {
    format!("{:>10}", s)
}

impl ListingTableRow {
    pub fn from_listing(listing: &ListingRecord) -> Self {
        let price = if listing.has_price() {
            format!("£{}", listing.price)
        } else {
            "N/A".to_string()
        };

        let featured = if listing.featured { "* " } else { "" };

        Self {
            id: listing.remote_id,
            price,
            house_info: format!("{}{}", featured, listing.house_info.as_deref().unwrap_or("")),
            date_added: format_date(listing.date_added),
            address: listing.address.clone().unwrap_or_default(),
            agent: listing.agent.clone().unwrap_or_default(),
        }
    }
}

pub fn create_listing_table(listings: &[ListingRecord]) -> String {
    let rows: Vec<ListingTableRow> = listings.iter().map(ListingTableRow::from_listing).collect();

    let mut table = Table::new(&rows);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::single(2)).with(Width::truncate(40)))
        .with(Modify::new(Columns::single(4)).with(Width::wrap(50)))
        .with(Modify::new(Columns::single(5)).with(Width::truncate(40)));

    table.to_string()
}

/// Writes the collection as CSV, one row per listing.
pub fn write_csv<W: Write>(listings: &ListingCollection, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "Id",
        "Link",
        "House info",
        "Address",
        "Description",
        "Agent",
        "Date added",
        "Date reduced",
        "Price",
        "Featured",
    ])?;

    for listing in listings {
        writer.write_record([
            listing.remote_id.to_string(),
            listing.link.clone(),
            listing.house_info.clone().unwrap_or_default(),
            listing.address.clone().unwrap_or_default(),
            listing.description.clone().unwrap_or_default(),
            listing.agent.clone().unwrap_or_default(),
            listing.date_added.map(|d| d.to_string()).unwrap_or_default(),
            listing.date_reduced.map(|d| d.to_string()).unwrap_or_default(),
            listing.price.to_string(),
            listing.featured.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_csv(listings: &ListingCollection, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(listings, file)
}
