use std::sync::LazyLock;

use html_escape::decode_html_entities;
use log::debug;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::extractors::Extractor;
use crate::model::Recipe;
use crate::text::{clean_space, coerce_int, duration_to_minutes};

/// Extracts recipes from schema.org JSON-LD script blocks.
pub struct JsonLdExtractor;

static HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
// Splits instruction prose on real newlines as well as the literal \n, \r
// and \t sequences some sites leave in their JSON.
static STEP_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n|\\n|\\r|\\t)+").unwrap());

impl Extractor for JsonLdExtractor {
    fn parse(&self, document: &Html, url: &str) -> Option<Recipe> {
        let blocks = find_blocks(document);
        let block = pick_recipe(&blocks)?;
        Some(extract_recipe(block, url))
    }
}

/// Collects every JSON-LD payload on the page, flattening top-level arrays
/// one level. Blocks that fail to parse are skipped, not fatal.
fn find_blocks(document: &Html) -> Vec<Value> {
    let selector = Selector::parse("script[type*='ld+json']").unwrap();
    let mut blocks = Vec::new();
    for script in document.select(&selector) {
        let raw = script.inner_html();
        let cleaned = HTML_COMMENT.replace_all(raw.trim(), "");
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(Value::Array(items)) => blocks.extend(items),
            Ok(value) => blocks.push(value),
            Err(err) => debug!("skipping malformed JSON-LD block: {err}"),
        }
    }
    blocks
}

/// Selection policy, per block in document order: a `@type` containing
/// "Recipe", then a Recipe inside `@graph`, then any block that looks like a
/// recipe because it carries ingredient or instruction fields.
fn pick_recipe(blocks: &[Value]) -> Option<&Value> {
    for block in blocks {
        if !block.is_object() {
            continue;
        }
        if type_names(block).contains(&"Recipe") {
            return Some(block);
        }
        if let Some(Value::Array(graph)) = block.get("@graph") {
            if let Some(item) = graph
                .iter()
                .find(|item| item.is_object() && type_names(item).contains(&"Recipe"))
            {
                return Some(item);
            }
        }
        if block.get("recipeIngredient").is_some() || block.get("recipeInstructions").is_some() {
            return Some(block);
        }
    }
    None
}

fn extract_recipe(block: &Value, source_url: &str) -> Recipe {
    let title = field(block, &["name", "headline"])
        .and_then(Value::as_str)
        .and_then(clean_text);

    let servings = field(block, &["recipeYield", "yield"]).and_then(coerce_int);

    let prep = duration_field(block, "prepTime");
    let cook = duration_field(block, "cookTime");
    let mut total = duration_field(block, "totalTime");
    if total.is_none() {
        if let (Some(prep), Some(cook)) = (prep, cook) {
            total = Some(prep + cook);
        }
    }

    let ingredients = block
        .get("recipeIngredient")
        .map(as_list)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Value::as_str)
        .filter_map(clean_text)
        .collect();

    let instructions = field(block, &["recipeInstructions", "instructions"])
        .map(normalize_instructions)
        .unwrap_or_default();

    let author = field(block, &["author", "creator"])
        .and_then(author_name)
        .and_then(|name| clean_text(&name));

    Recipe {
        title,
        servings,
        time_prep_min: prep,
        time_cook_min: cook,
        time_total_min: total,
        ingredients,
        instructions,
        author,
        source_url: source_url.to_string(),
        image: block.get("image").and_then(image_url),
        categories: collect_categories(block),
        cuisine: block.get("recipeCuisine").and_then(cuisine_text),
    }
}

/// Flattens `recipeInstructions` into an ordered list of step texts.
///
/// One explicit switch over the three JSON shapes: prose is split into
/// fragments, arrays concatenate in order, and objects are dispatched on
/// their type tag. Sections recurse into their item list, so arbitrarily
/// nested section/step trees flatten without a depth bound.
fn normalize_instructions(value: &Value) -> Vec<String> {
    let mut steps = Vec::new();
    match value {
        Value::String(text) => {
            steps.extend(STEP_SPLIT.split(text).filter_map(clean_text));
        }
        Value::Array(items) => {
            for item in items {
                steps.extend(normalize_instructions(item));
            }
        }
        Value::Object(_) => match step_tag(value) {
            "HowToStep" | "HowToDirection" => {
                if let Some(step) = step_text(value) {
                    steps.push(step);
                }
            }
            "HowToSection" => {
                if let Some(inner) = field(value, &["itemListElement", "steps"]) {
                    steps.extend(normalize_instructions(inner));
                }
            }
            // untyped or unrecognized mappings still often carry the step
            _ => {
                if let Some(step) = step_text(value) {
                    steps.push(step);
                }
            }
        },
        _ => {}
    }
    steps
}

fn step_text(value: &Value) -> Option<String> {
    field(value, &["text", "name", "description"])
        .and_then(Value::as_str)
        .and_then(clean_text)
}

/// The object's type tag, for step dispatch. Non-text tags count as
/// unrecognized rather than falling through to the plain `type` key.
fn step_tag(value: &Value) -> &str {
    for key in ["@type", "type"] {
        match value.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(Value::Array(items)) if items.is_empty() => continue,
            Some(Value::String(s)) => return s,
            Some(_) => return "",
        }
    }
    ""
}

/// Author / creator shapes seen in the wild: a name string, a Person object,
/// or a list of either. The first usable name wins.
fn author_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => Some(name.clone()),
        Value::Object(_) => value
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) => {
                        if let Some(name) = item
                            .get("name")
                            .and_then(Value::as_str)
                            .filter(|name| !name.trim().is_empty())
                        {
                            return Some(name.to_string());
                        }
                    }
                    Value::String(name) => return Some(name.clone()),
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

/// Image shapes: a URL string, an ImageObject, or a list of either.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(url) => Some(url.clone()),
        Value::Object(_) => object_image_url(value),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) => {
                        if let Some(url) = object_image_url(item) {
                            return Some(url);
                        }
                    }
                    Value::String(url) => return Some(url.clone()),
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

fn object_image_url(value: &Value) -> Option<String> {
    field(value, &["url", "contentUrl"])
        .and_then(Value::as_str)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

/// `recipeCategory` entries plus `keywords`; only keywords are comma-split.
fn collect_categories(block: &Value) -> Vec<String> {
    let mut categories = Vec::new();
    for key in ["recipeCategory", "keywords"] {
        match block.get(key) {
            Some(Value::Array(items)) => categories.extend(items.iter().map(stringify)),
            Some(Value::String(text)) => {
                if key == "keywords" {
                    categories.extend(
                        text.split(',')
                            .map(str::trim)
                            .filter(|part| !part.is_empty())
                            .map(str::to_string),
                    );
                } else {
                    categories.push(text.clone());
                }
            }
            _ => {}
        }
    }
    categories
}

fn cuisine_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .map(stringify)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First-non-empty field lookup: null, `""`, `[]` and `{}` count as absent,
/// anything else (including blank-but-nonempty strings) is taken as found.
fn field<'a>(block: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| block.get(key))
        .find(|value| non_empty(value))
}

/// A scalar is its own one-element list; null is empty.
fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// `@type` may be a string or a list of strings.
fn type_names(block: &Value) -> Vec<&str> {
    match block.get("@type") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn duration_field(block: &Value, key: &str) -> Option<u32> {
    block
        .get(key)
        .and_then(Value::as_str)
        .and_then(duration_to_minutes)
}

/// CMS output often arrives double-encoded, so decode twice before
/// normalizing whitespace.
fn clean_text(text: &str) -> Option<String> {
    let decoded = decode_html_entities(decode_html_entities(text).as_ref()).into_owned();
    clean_space(&decoded)
}
