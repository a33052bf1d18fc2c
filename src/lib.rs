pub mod crawl;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod links;
pub mod model;
pub mod settings;
pub mod text;
pub mod writer;

use scraper::{Html, Selector};

use crate::extractors::{Extractor, JsonLdExtractor};
use crate::text::clean_space;

pub use crate::crawl::{CrawlOptions, Crawler};
pub use crate::error::HarvestError;
pub use crate::model::Recipe;
pub use crate::writer::Schema;

/// Extracts the recipe embedded in a fetched page, if any.
///
/// A recipe with no title in its metadata borrows the page's `<title>` text.
/// Pure function of the page content: the same page always yields the same
/// record.
pub fn scrape_page(html: &str, url: &str) -> Option<Recipe> {
    let document = Html::parse_document(html);
    let mut recipe = JsonLdExtractor.parse(&document, url)?;
    if recipe.title.is_none() {
        let selector = Selector::parse("title").unwrap();
        recipe.title = document
            .select(&selector)
            .next()
            .and_then(|title| clean_space(&title.text().collect::<String>()));
    }
    Some(recipe)
}
