use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use log::{error, info};
use url::Url;

use crate::fetch::PageFetcher;
use crate::links::collect_links;
use crate::scrape_page;
use crate::writer::{write_recipe, Schema};

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub max_depth: usize,
    /// Politeness pause after every processed URL, success or not.
    pub delay: Duration,
    pub out_dir: PathBuf,
    pub schema: Schema,
    pub per_person: bool,
    pub overwrite: bool,
}

/// Breadth-first crawl over discovered links, bounded by depth.
///
/// The frontier (FIFO queue plus visited set) lives on the crawler and is
/// discarded with it; nothing persists across invocations. One entry is
/// processed to completion — fetch, collect links, extract, write — before
/// the next is dequeued, so at most one recipe is ever in flight.
pub struct Crawler {
    fetcher: PageFetcher,
    options: CrawlOptions,
    visited: HashSet<String>,
    queue: VecDeque<(String, usize)>,
}

impl Crawler {
    pub fn new(fetcher: PageFetcher, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            options,
            visited: HashSet::new(),
            queue: VecDeque::new(),
        }
    }

    /// Runs the frontier to exhaustion and returns the number of recipes
    /// written. Fetch and write failures are logged and never abort the run.
    pub fn crawl(&mut self, seeds: &[String]) -> usize {
        for seed in seeds {
            self.queue.push_back((strip_fragment(seed), 0));
        }

        let mut written = 0;
        while let Some((url, depth)) = self.queue.pop_front() {
            if self.visited.contains(&url) || depth > self.options.max_depth {
                continue;
            }
            self.visited.insert(url.clone());

            info!("[depth {depth}] fetching {url}");
            if let Some(html) = self.fetcher.fetch(&url) {
                let links = collect_links(&url, &html);
                // pages at the depth limit are still mined for a recipe,
                // they just stop feeding the frontier
                if depth < self.options.max_depth {
                    for link in links {
                        if !self.visited.contains(&link) {
                            self.queue.push_back((link, depth + 1));
                        }
                    }
                }

                if let Some(recipe) = scrape_page(&html, &url) {
                    match write_recipe(
                        &recipe,
                        &self.options.out_dir,
                        self.options.schema,
                        self.options.overwrite,
                        self.options.per_person,
                    ) {
                        Ok(path) => {
                            info!("saved {}", path.display());
                            written += 1;
                        }
                        Err(err) => error!("could not save recipe from {url}: {err}"),
                    }
                }
            }

            if !self.options.delay.is_zero() {
                thread::sleep(self.options.delay);
            }
        }
        written
    }
}

/// Frontier entries are fragment-free; a seed that does not parse as a URL
/// is queued as-is and will fail at fetch time like any other bad URL.
fn strip_fragment(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}
