use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use immo_scout::export::export_csv;
use immo_scout::models::{Category, ListingRecord};
use immo_scout::pipeline::{clean, ProgressEvent, ProgressReporter};
use immo_scout::scrapers::types::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use immo_scout::scrapers::{CoinAfriqueScraper, ScrapeParams, ScraperTrait};
use immo_scout::stats::MarketSummary;
use immo_scout::storage::{ListingStore, DEFAULT_DB_PATH};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PREVIEW_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "immo-scout", about = "Dakar real-estate listings from CoinAfrique")]
struct Cli {
    /// SQLite file holding one table per category
    #[arg(long, global = true, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Site root that index paths and listing links resolve against
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl, clean and store listings, replacing the stored dataset
    Scrape {
        target: Target,
        /// Number of index pages to crawl
        #[arg(short = 'n', long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=200))]
        pages: u32,
        /// Also write `<category>.csv` into this directory
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Print a stored dataset
    Show {
        category: Category,
        /// Max rows to display
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a stored dataset as CSV
    Export {
        category: Category,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Market summary of stored datasets
    Stats { category: Option<Category> },
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Villas,
    Appartements,
    All,
}

impl Target {
    fn categories(self) -> Vec<Category> {
        match self {
            Target::Villas => vec![Category::Villas],
            Target::Appartements => vec![Category::Appartements],
            Target::All => Category::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = ListingStore::new(&cli.db);
    let params = ScrapeParams {
        base_url: cli.base_url.clone(),
        timeout: Duration::from_secs(cli.timeout),
        user_agent: DEFAULT_USER_AGENT.to_string(),
    };

    match cli.command {
        Commands::Scrape {
            target,
            pages,
            csv_dir,
        } => {
            for category in target.categories() {
                scrape_category(&store, &params, category, pages, csv_dir.as_deref()).await?;
            }
        }
        Commands::Show {
            category,
            limit,
            json,
        } => show(&store, category, limit, json)?,
        Commands::Export { category, output } => {
            let records = load_or_hint(&store, category)
                .with_context(|| format!("No stored data for {}", category))?;
            export_csv(&output, &records)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("💾 Exported {} row(s) to {}", records.len(), output.display());
        }
        Commands::Stats { category } => {
            let categories = category.map(|c| vec![c]).unwrap_or_else(|| Category::ALL.to_vec());
            for category in categories {
                if let Some(records) = load_or_hint(&store, category) {
                    println!("== {} ==", category);
                    println!("{}", MarketSummary::from_records(&records));
                }
            }
        }
    }

    Ok(())
}

async fn scrape_category(
    store: &ListingStore,
    params: &ScrapeParams,
    category: Category,
    pages: u32,
    csv_dir: Option<&Path>,
) -> Result<()> {
    info!("🏠 Scraping {} ({} page(s))", category, pages);

    let (progress, events) = ProgressReporter::channel();
    let bar = tokio::spawn(drive_progress_bar(events, pages));

    let scraper = CoinAfriqueScraper::with_params(params.clone())?.with_progress(progress);
    let report = scraper.scrape(category, pages).await;
    // closes the progress channel
    drop(scraper);
    let _ = bar.await;

    if !report.failed_pages.is_empty() {
        warn!("Index pages skipped: {:?}", report.failed_pages);
    }
    if report.records.is_empty() {
        warn!("No {} listings collected, stored dataset left untouched", category);
        return Ok(());
    }

    let elapsed = report.finished_at - report.started_at;
    info!(
        "✅ Collected {} {} listing(s) in {}s (skipped: {})",
        report.records.len(),
        category,
        elapsed.num_seconds(),
        report.skipped
    );

    let records = clean(report.records);
    store
        .save_category(category, &records)
        .with_context(|| format!("Failed to save {} to {}", category, store.path().display()))?;

    print_rows(&records, PREVIEW_ROWS);

    if let Some(dir) = csv_dir {
        let path = dir.join(format!("{}.csv", category.slug()));
        export_csv(&path, &records)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved CSV to {}", path.display());
    }

    Ok(())
}

async fn drive_progress_bar(mut events: UnboundedReceiver<ProgressEvent>, total: u32) {
    let bar = ProgressBar::new(u64::from(total));
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }

    while let Some(event) = events.recv().await {
        match event {
            ProgressEvent::PageStarted { page, total } => {
                bar.set_message(format!("page {}/{}", page, total));
            }
            ProgressEvent::PageCompleted { .. } => bar.inc(1),
            ProgressEvent::PageFailed { page, error, .. } => {
                bar.println(format!("⚠️  page {} failed: {}", page, error));
                bar.inc(1);
            }
            ProgressEvent::Notice(message) => bar.println(message),
            ProgressEvent::Finished { .. } => bar.finish_and_clear(),
        }
    }
}

fn load_or_hint(store: &ListingStore, category: Category) -> Option<Vec<ListingRecord>> {
    let records = store.load_category(category);
    if records.is_none() {
        warn!("No {} data found in {}. Run a scrape first.", category, store.path().display());
    }
    records
}

fn show(store: &ListingStore, category: Category, limit: usize, json: bool) -> Result<()> {
    let Some(records) = load_or_hint(store, category) else {
        return Ok(());
    };

    if json {
        let shown = &records[..records.len().min(limit)];
        println!("{}", serde_json::to_string_pretty(shown)?);
    } else {
        print_rows(&records, limit);
        println!("({} of {} row(s))", records.len().min(limit), records.len());
    }
    Ok(())
}

fn print_rows(records: &[ListingRecord], limit: usize) {
    for (i, record) in records.iter().take(limit).enumerate() {
        let price = record
            .price
            .map(|p| format!("{} FCFA", p))
            .unwrap_or_else(|| "n/a".to_string());
        println!("{}. {} ({})", i + 1, record.details, price);
        println!("   {}", record.address);
        if let Some(rooms) = record.number_of_rooms {
            println!("   {} room(s)", rooms);
        }
        if let Some(image) = &record.image_link {
            println!("   Image: {}", image);
        }
    }
}
