//! Article metadata extraction
//!
//! Each field has an ordered list of extractors; the first one that yields
//! a non-empty value wins, and a field nothing matches is the empty string.

use scraper::{Html, Selector};

/// Metadata recorded for every crawled page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub category: String,
    pub author: String,
    pub description: String,
}

type FieldExtractor = fn(&Html) -> Option<String>;

const TITLE: &[FieldExtractor] = &[title_tag, og_title];
const CATEGORY: &[FieldExtractor] = &[article_section, category_links];
const AUTHOR: &[FieldExtractor] = &[author_meta, author_link];
const DESCRIPTION: &[FieldExtractor] = &[description_meta, og_description];

/// Extracts title, category, author and description from a page
///
/// Never fails; missing fields are empty.
///
/// # Example
///
/// ```
/// use portal_crawler::crawler::extract_metadata;
///
/// let html = r#"<html><head><meta property="og:title" content="Fallback"></head></html>"#;
/// assert_eq!(extract_metadata(html).title, "Fallback");
/// ```
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    PageMetadata {
        title: first_match(&document, TITLE),
        category: first_match(&document, CATEGORY),
        author: first_match(&document, AUTHOR),
        description: first_match(&document, DESCRIPTION),
    }
}

fn first_match(document: &Html, chain: &[FieldExtractor]) -> String {
    chain
        .iter()
        .find_map(|extract| extract(document).filter(|value| !value.is_empty()))
        .unwrap_or_default()
}

fn element_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
}

fn title_tag(document: &Html) -> Option<String> {
    element_text(document, "title")
}

fn og_title(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[property="og:title"]"#)
}

fn article_section(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[property="article:section"]"#)
}

/// WordPress-style `rel="category tag"` links, joined
fn category_links(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"a[rel="category tag"]"#).ok()?;
    let names: Vec<String> = document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    Some(names.join(", "))
}

fn author_meta(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[name="author"]"#)
}

fn author_link(document: &Html) -> Option<String> {
    element_text(document, r#"a[rel~="author"]"#)
}

fn description_meta(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[name="description"]"#)
}

fn og_description(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[property="og:description"]"#)
}
