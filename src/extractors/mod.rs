use scraper::Html;

use crate::model::Recipe;

mod json_ld;

pub use self::json_ld::JsonLdExtractor;

/// Pulls a recipe out of a parsed page.
///
/// `None` is the normal "this page is not a recipe" outcome, not an error.
pub trait Extractor {
    fn parse(&self, document: &Html, url: &str) -> Option<Recipe>;
}
