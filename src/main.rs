use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{error, info};

use recipe_harvest::crawl::{CrawlOptions, Crawler};
use recipe_harvest::error::HarvestError;
use recipe_harvest::fetch::PageFetcher;
use recipe_harvest::settings::Settings;
use recipe_harvest::writer::Schema;

const EXIT_NO_URLS: u8 = 1;
const EXIT_BAD_URL_FILE: u8 = 2;
const EXIT_NO_RECIPES: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "recipe-harvest",
    about = "Crawls recipe pages and saves schema.org recipes as YAML documents"
)]
struct Cli {
    /// Recipe or listing page URLs to start from
    urls: Vec<String>,

    /// Text file with one URL per line; blank lines and # comments ignored
    #[arg(long)]
    urls_file: Option<PathBuf>,

    /// Directory for the .yml documents
    #[arg(long, default_value = "opskrifter")]
    out_dir: PathBuf,

    /// Output document shape
    #[arg(long, value_enum, default_value = "rich")]
    schema: SchemaArg,

    /// With the simple schema: rewrite ingredients per serving
    #[arg(long)]
    per_person: bool,

    /// Overwrite existing documents instead of probing -2, -3, ...
    #[arg(long)]
    overwrite: bool,

    /// Seconds to pause between requests
    #[arg(long, default_value_t = 0.0)]
    sleep: f64,

    /// How deep the crawler may follow links from the seeds
    #[arg(long, default_value_t = 5)]
    depth: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SchemaArg {
    Rich,
    Simple,
}

impl From<SchemaArg> for Schema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Rich => Schema::Rich,
            SchemaArg::Simple => Schema::Simple,
        }
    }
}

/// Seeds come from the positional arguments plus the optional URL file,
/// in that order.
fn gather_urls(cli: &Cli) -> Result<Vec<String>, HarvestError> {
    let mut urls = cli.urls.clone();
    if let Some(path) = &cli.urls_file {
        let contents =
            std::fs::read_to_string(path).map_err(|source| HarvestError::UrlFile {
                path: path.clone(),
                source,
            })?;
        urls.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    if urls.is_empty() {
        return Err(HarvestError::NoUrls);
    }
    Ok(urls)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let urls = match gather_urls(&cli) {
        Ok(urls) => urls,
        Err(err @ HarvestError::NoUrls) => {
            error!("{err}: supply at least one URL or --urls-file");
            return ExitCode::from(EXIT_NO_URLS);
        }
        Err(err) => {
            error!("{err}");
            return ExitCode::from(EXIT_BAD_URL_FILE);
        }
    };

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            error!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    let fetcher = match PageFetcher::new(
        Duration::from_secs(settings.timeout),
        &settings.user_agent,
    ) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            error!("could not build HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = CrawlOptions {
        max_depth: cli.depth,
        delay: Duration::from_secs_f64(cli.sleep.max(0.0)),
        out_dir: cli.out_dir.clone(),
        schema: cli.schema.into(),
        per_person: cli.per_person,
        overwrite: cli.overwrite,
    };
    let written = Crawler::new(fetcher, options).crawl(&urls);

    info!("done, saved {written} recipes to {}", cli.out_dir.display());
    if written > 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NO_RECIPES)
    }
}
