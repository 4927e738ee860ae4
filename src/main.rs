use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use gig_scraper::{logging, AggregationStore, ReqwestFetcher, RunOptions, Scraper, SiteConfig};

#[derive(Parser)]
#[command(name = "gig_scraper")]
#[command(about = "Scrapes gig listings and ticket prices into JSON")]
#[command(version)]
struct Cli {
    /// TOML file overriding the built-in site layout
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for rotated JSON log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the listing pages and every event they link to
    Crawl {
        /// Number of listing pages to crawl (discovered from the site when omitted)
        #[arg(long)]
        pages: Option<u32>,
        /// Print each event as soon as it is extracted
        #[arg(long, short)]
        verbose: bool,
        /// Write the aggregate result here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Listing URL template with a {page} placeholder
        #[arg(long)]
        url: Option<String>,
    },
    /// Extract a single event page
    Event {
        url: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("loading site config from {}", path.display())),
        None => Ok(SiteConfig::default()),
    }
}

/// The aggregate result as printed or written at the end of a crawl.
///
/// When per-event lines have already gone to stdout the aggregate is one
/// compact line too, so stdout stays one JSON value per line.
fn aggregate_output(store: &AggregationStore, line_delimited: bool) -> gig_scraper::Result<String> {
    if line_delimited {
        Ok(store.render()?.to_string())
    } else {
        store.render_pretty()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli.log_dir);

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Crawl { pages, verbose, output, url } => {
            if let Some(url) = url {
                config.listings_url = url;
            }
            let fetcher = Arc::new(ReqwestFetcher::new(&config).context("building HTTP client")?);
            let mut scraper = Scraper::new(config, fetcher).context("invalid site config")?;

            let options = RunOptions { page_override: pages, verbose };
            let summary = scraper
                .run(&options, |event| match AggregationStore::render_event(event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => warn!(link = %event.link, error = %e, "Could not render event"),
                })
                .await;

            let line_delimited = verbose && output.is_none();
            let rendered = aggregate_output(scraper.store(), line_delimited)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), events = summary.events_extracted, "Wrote results");
                }
                None => println!("{rendered}"),
            }
        }
        Commands::Event { url } => {
            let fetcher = Arc::new(ReqwestFetcher::new(&config).context("building HTTP client")?);
            let mut scraper = Scraper::new(config, fetcher).context("invalid site config")?;

            if scraper.extract_single(&url).await.is_none() {
                warn!(url = %url, "No event extracted");
            }
            println!("{}", scraper.store().render_pretty()?);
        }
    }

    Ok(())
}
