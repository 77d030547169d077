//! Article extraction and HTML-to-Markdown conversion.
//!
//! Extraction pulls the title and content region out of a cached page;
//! conversion turns the content markup into clean, normalized Markdown
//! via the `htmd` crate plus a cleanup pipeline.

mod cleanup;
mod extract;

use htmd::options::{BulletListMarker, HeadingStyle, Options};
use tracing::warn;

pub use extract::{ExtractedArticle, extract_article};

/// Convert article HTML to normalized Markdown.
///
/// ATX (`#`) headings, `-` bullets, blank-line runs collapsed, trailing
/// whitespace stripped, non-breaking spaces replaced, result trimmed.
/// Malformed markup degrades gracefully; this never fails.
pub fn to_markdown(html: &str) -> String {
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .options(Options {
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: BulletListMarker::Dash,
            ..Default::default()
        })
        .build();

    let raw = match converter.convert(html) {
        Ok(md) => md,
        Err(e) => {
            warn!(error = %e, "markdown conversion failed, emitting empty body");
            String::new()
        }
    };

    cleanup::run_pipeline(&raw)
}
