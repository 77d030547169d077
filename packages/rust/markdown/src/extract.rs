//! Article extraction from cached help-center pages.
//!
//! Locates the title and the main content region, strips non-content
//! markup, and rejects documents without a recognizable article body —
//! an expected outcome for listing/index pages, not an error.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

/// Title + raw content markup for one article, held only during conversion.
#[derive(Debug, Clone)]
pub struct ExtractedArticle {
    /// Cleaned article title.
    pub title: String,
    /// Raw HTML of the article body, script/style subtrees removed.
    pub content_html: String,
}

/// Trailing site-name suffix on titles. The mangled `â€“` form appears when
/// the en dash was decoded as cp1252 somewhere upstream.
static SITE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:–|â€“|-)\s*Internet Computer\s*$").expect("suffix regex")
});

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("script regex"));

static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("style regex"));

/// Extract title and content markup from a cached page.
///
/// Title resolution order: `h1[itemprop="name"]`, then `<title>`. The
/// content region is the `section.article-content` element. Returns `None`
/// when either the title or the content region is missing.
pub fn extract_article(html: &str) -> Option<ExtractedArticle> {
    let doc = Html::parse_document(html);

    let h1_sel = Selector::parse(r#"h1[itemprop="name"]"#).unwrap();
    let title_sel = Selector::parse("title").unwrap();
    let content_sel = Selector::parse("section.article-content").unwrap();

    let raw_title = match doc.select(&h1_sel).next() {
        Some(el) => el.text().collect::<String>(),
        None => doc.select(&title_sel).next()?.text().collect::<String>(),
    };
    let title = clean_title(&raw_title);

    let Some(content_el) = doc.select(&content_sel).next() else {
        debug!("no article content region found");
        return None;
    };

    let content_html = strip_scripts(&content_el.html());

    Some(ExtractedArticle {
        title,
        content_html,
    })
}

/// Strip the trailing site-name suffix and surrounding whitespace.
fn clean_title(raw: &str) -> String {
    SITE_SUFFIX_RE.replace(raw.trim(), "").trim().to_string()
}

/// Remove embedded `<script>` and `<style>` subtrees from raw markup.
fn strip_scripts(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    STYLE_RE.replace_all(&without_scripts, "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_fixture(name: &str) -> String {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    #[test]
    fn extract_article_fixture() {
        let html = load_fixture("html/article.html");
        let article = extract_article(&html).expect("article page extracts");

        assert_eq!(article.title, "Introduction to Canisters");
        assert!(article.content_html.contains("<h2>"));
        assert!(article.content_html.contains("smart contracts"));
        assert!(!article.content_html.contains("<script"));
        assert!(!article.content_html.contains("<style"));
    }

    #[test]
    fn listing_page_without_content_region_yields_none() {
        let html = load_fixture("html/listing.html");
        assert!(extract_article(&html).is_none());
    }

    #[test]
    fn title_falls_back_to_title_element() {
        let html = r#"<html><head><title>Fallback Title – Internet Computer</title></head>
            <body><section class="article-content"><p>Body</p></section></body></html>"#;

        let article = extract_article(html).unwrap();
        assert_eq!(article.title, "Fallback Title");
    }

    #[test]
    fn no_title_at_all_yields_none() {
        let html = r#"<html><body><section class="article-content"><p>Body</p></section></body></html>"#;
        assert!(extract_article(html).is_none());
    }

    #[test]
    fn clean_title_strips_en_dash_suffix() {
        assert_eq!(clean_title("Intro – Internet Computer"), "Intro");
    }

    #[test]
    fn clean_title_strips_mangled_dash_suffix() {
        assert_eq!(clean_title("Intro â€“ Internet Computer"), "Intro");
    }

    #[test]
    fn clean_title_strips_plain_hyphen_suffix() {
        assert_eq!(clean_title("Intro - Internet Computer "), "Intro");
    }

    #[test]
    fn clean_title_keeps_unrelated_titles() {
        assert_eq!(clean_title("Internet Computer Basics"), "Internet Computer Basics");
    }

    #[test]
    fn strip_scripts_removes_embedded_blocks() {
        let html = r#"<div><p>Keep</p><script type="text/javascript">var x = 1;</script><style>.a{color:red}</style></div>"#;
        let cleaned = strip_scripts(html);
        assert!(cleaned.contains("Keep"));
        assert!(!cleaned.contains("var x"));
        assert!(!cleaned.contains("color:red"));
    }
}
