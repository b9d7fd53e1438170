use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rightmove_core::{
    create_listing_table, export_csv, Location, LocationCodes, PropertyType, SearchCriteria,
    SiteConfig, SortType, ALLOWED_RADIUS_VALUES, DEFAULT_BASE_URL,
};
use rightmove_scrapers::{FetcherConfig, HttpFetcher, PropertyPageParser, RightmoveSearch};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Site base URL (-b, --base-url)
    #[arg(short = 'b', long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds (-T, --timeout)
    #[arg(short = 'T', long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search listings for sale
    #[command(about = "Search listings for sale")]
    #[command(long_about = "Search listings for sale in an outcode or region, fetching every result page and merging duplicates.")]
    Search(SearchCommand),

    /// Show a single listing's details
    #[command(about = "Show a single listing's details")]
    #[command(long_about = "Fetch a listing's detail page by id and print its details, optionally saving its images.")]
    Property(PropertyCommand),

    /// List known region names
    #[command(about = "List known region names")]
    Regions(CodesArgs),
}

#[derive(Args)]
struct CodesArgs {
    /// Outcode table JSON file (--outcodes), requires --regions
    #[arg(long, requires = "regions")]
    outcodes: Option<PathBuf>,

    /// Region table JSON file (--regions), requires --outcodes
    #[arg(long, requires = "outcodes")]
    regions: Option<PathBuf>,
}

impl CodesArgs {
    fn load(&self) -> anyhow::Result<LocationCodes> {
        match (&self.outcodes, &self.regions) {
            (Some(outcodes), Some(regions)) => LocationCodes::from_files(outcodes, regions)
                .context("Failed to load location code tables"),
            _ => Ok(LocationCodes::bundled()?),
        }
    }
}

#[derive(Parser)]
struct SearchCommand {
    /// Outcode to search in, e.g. OL6 (-o, --outcode)
    #[arg(short = 'o', long, conflicts_with = "region", required_unless_present = "region")]
    outcode: Option<String>,

    /// Region to search in, e.g. Oldham (-r, --region)
    #[arg(short = 'r', long)]
    region: Option<String>,

    /// Minimum bedrooms, 0 for no minimum (-n, --min-bedrooms)
    #[arg(short = 'n', long, default_value_t = 2)]
    min_bedrooms: u32,

    /// Maximum bedrooms, 0 for no maximum (-N, --max-bedrooms)
    #[arg(short = 'N', long, default_value_t = 3)]
    max_bedrooms: u32,

    /// Minimum price, 0 for no minimum (-p, --min-price)
    #[arg(short = 'p', long, default_value_t = 150_000)]
    min_price: i64,

    /// Maximum price, 0 for no maximum (-P, --max-price)
    #[arg(short = 'P', long, default_value_t = 300_000)]
    max_price: i64,

    /// Property types, comma separated (-t, --property-type)
    #[arg(short = 't', long, num_args = 1.., value_delimiter = ',')]
    property_type: Vec<PropertyType>,

    /// Sort order: highest-price, lowest-price, newest-listed, oldest-listed (-s, --sort)
    #[arg(short = 's', long, default_value = "newest-listed")]
    sort: SortType,

    /// Radius in miles (-R, --radius)
    #[arg(short = 'R', long, default_value_t = 0.0)]
    radius: f64,

    /// Include sold subject to contract listings (--include-sstc)
    #[arg(long)]
    include_sstc: bool,

    /// Write the results to a CSV file (-c, --csv)
    #[arg(short = 'c', long)]
    csv: Option<PathBuf>,

    /// Print the results as JSON instead of a table (-j, --json)
    #[arg(short = 'j', long)]
    json: bool,

    /// Maximum number of listings to print (-l, --limit)
    #[arg(short = 'l', long, default_value_t = 50)]
    limit: usize,

    #[command(flatten)]
    codes: CodesArgs,
}

impl SearchCommand {
    fn criteria(&self) -> anyhow::Result<SearchCriteria> {
        let location = match (&self.outcode, &self.region) {
            (Some(outcode), _) => Location::Outcode(outcode.clone()),
            (None, Some(region)) => Location::Region(region.clone()),
            (None, None) => anyhow::bail!("either --outcode or --region is required"),
        };

        let mut criteria = SearchCriteria::default();
        criteria.location = Some(location);
        criteria.min_bedrooms = self.min_bedrooms;
        criteria.max_bedrooms = self.max_bedrooms;
        criteria.min_price = self.min_price;
        criteria.max_price = self.max_price;
        criteria.property_types = self.property_type.iter().copied().collect();
        criteria.sort = self.sort;
        criteria.include_sstc = self.include_sstc;
        criteria
            .set_radius(self.radius)
            .with_context(|| format!("radius must be one of {:?}", ALLOWED_RADIUS_VALUES))?;

        Ok(criteria)
    }
}

#[derive(Parser)]
struct PropertyCommand {
    /// Listing id
    id: u64,

    /// Save the listing's images into this directory (-i, --images)
    #[arg(short = 'i', long)]
    images: Option<PathBuf>,
}

/// Cancels `cancel` on Ctrl-C.
fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            cancel.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let site = SiteConfig::with_base_url(&cli.base_url)?;
    let fetcher = Arc::new(HttpFetcher::with_config(FetcherConfig {
        timeout: Duration::from_secs(cli.timeout),
        ..FetcherConfig::default()
    })?);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    match cli.command {
        Commands::Search(cmd) => {
            let criteria = cmd.criteria()?;
            let codes = Arc::new(cmd.codes.load()?);
            let search = RightmoveSearch::new(fetcher, codes, site)?;

            let listings = search.search(&criteria, &cancel).await?;
            info!("Found {} listings", listings.len());

            let shown = &listings.as_slice()[..listings.len().min(cmd.limit)];
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(shown)?);
            } else {
                println!("{}", create_listing_table(shown));
            }

            if let Some(path) = &cmd.csv {
                export_csv(&listings, path)?;
                info!("Saved {} listings to {}", listings.len(), path.display());
            }
        }
        Commands::Property(cmd) => {
            let parser = PropertyPageParser::new(fetcher.clone(), site.clone())?;
            let listing = parser.parse_property(cmd.id, &cancel).await?;

            println!("{}", listing);
            if let Some(url) = listing.url(&site) {
                println!("URL: {}", url);
            }
            if let Some(description) = &listing.description {
                println!("\n{}", description);
            }

            if let Some(dir) = &cmd.images {
                tokio::fs::create_dir_all(dir).await?;
                for (index, url) in listing.image_urls.iter().enumerate() {
                    match fetcher.download_image(url, &cancel).await {
                        Ok(bytes) => {
                            let extension = url.rsplit('.').next().filter(|e| e.len() <= 4).unwrap_or("jpg");
                            let path = dir.join(format!("{}_{}.{}", listing.remote_id, index, extension));
                            tokio::fs::write(&path, bytes).await?;
                            info!("Saved {}", path.display());
                        }
                        Err(e) if e.is_cancelled() => return Err(e.into()),
                        Err(e) => warn!("Failed to download {}: {}", url, e),
                    }
                }
            }
        }
        Commands::Regions(args) => {
            let codes = args.load()?;
            for name in codes.region_names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
