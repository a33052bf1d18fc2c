use scraper::{Html, Selector};
use url::Url;

/// Path marker for recipe detail pages.
const RECIPE_SECTION: &str = "/opskrifter/";
/// Link marker for "see more recipes" pagination buttons.
const MORE_RECIPES: &str = "se-flere";
/// Query marker for numbered pagination.
///
/// Deliberately matched anywhere in the URL, which is known to over-match
/// unrelated `page=` parameters on foreign sites; the behavior is kept
/// because listing pages in the wild carry it in several positions.
const PAGE_PARAM: &str = "page=";

/// Scans a fetched page for recipe-detail and pagination links.
///
/// Every hyperlink is resolved against the page URL and stripped of its
/// fragment; candidates come back as a sorted, deduplicated list of absolute
/// URLs.
pub fn collect_links(page_url: &str, html: &str) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(_) => return Vec::new(),
    };
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();

    let mut links: Vec<String> = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .map(|mut resolved| {
            resolved.set_fragment(None);
            resolved
        })
        .filter(is_candidate)
        .map(|url| url.to_string())
        .collect();
    links.sort();
    links.dedup();
    links
}

fn is_candidate(url: &Url) -> bool {
    let detail = url.path().contains(RECIPE_SECTION) && url.path().ends_with('/');
    let pagination = url.as_str().contains(PAGE_PARAM) || url.as_str().contains(MORE_RECIPES);
    detail || pagination
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://example.dk/opskrifter/";

    #[test]
    fn relative_detail_links_resolve_against_the_page() {
        let html = r#"<a href="/opskrifter/pasta/">Pasta</a> <a href="boller/">Boller</a>"#;
        assert_eq!(
            collect_links(PAGE_URL, html),
            vec![
                "https://example.dk/opskrifter/boller/",
                "https://example.dk/opskrifter/pasta/",
            ]
        );
    }

    #[test]
    fn detail_links_need_a_trailing_slash() {
        let html = r#"<a href="/opskrifter/pasta">uden skråstreg</a>"#;
        assert!(collect_links(PAGE_URL, html).is_empty());
    }

    #[test]
    fn pagination_links_match_anywhere() {
        let html = r#"
            <a href="/opskrifter?page=2">Næste</a>
            <a href="/se-flere-opskrifter">Se flere</a>
            <a href="https://andet.dk/artikler?page=9">fremmed side</a>
        "#;
        assert_eq!(
            collect_links(PAGE_URL, html),
            vec![
                "https://andet.dk/artikler?page=9",
                "https://example.dk/opskrifter?page=2",
                "https://example.dk/se-flere-opskrifter",
            ]
        );
    }

    #[test]
    fn fragments_are_stripped_and_duplicates_collapse() {
        let html = r#"
            <a href="/opskrifter/pasta/#kommentarer">a</a>
            <a href="/opskrifter/pasta/">b</a>
        "#;
        assert_eq!(
            collect_links(PAGE_URL, html),
            vec!["https://example.dk/opskrifter/pasta/"]
        );
    }

    #[test]
    fn unrelated_links_are_dropped() {
        let html = r#"
            <a href="/om-os/">Om os</a>
            <a href="https://example.dk/kontakt/">Kontakt</a>
            <a href="mailto:hej@example.dk">skriv</a>
        "#;
        assert!(collect_links(PAGE_URL, html).is_empty());
    }

    #[test]
    fn unparseable_base_yields_nothing() {
        assert!(collect_links("not a url", "<a href='/opskrifter/x/'>x</a>").is_empty());
    }
}
