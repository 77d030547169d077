//! Table-of-contents extraction for bundled skill files.
//!
//! Headings are collected from h1/h2 lines outside code fences, then run
//! through a filter that rejects shell-comment and code-like lines that
//! only look like markdown headings.

use std::sync::LazyLock;

use regex::Regex;

/// Matches an h1/h2 ATX heading line.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,2})\s+(.+)$").expect("heading regex"));

/// Characters stripped when building anchors.
static ANCHOR_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("anchor strip regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Fragments that mark a heading as code rather than prose.
const CODE_MARKERS: [&str; 6] = ["()", "=>", "->", "::", "=", "{"];

/// Extract h1/h2 headings for a table of contents, skipping fenced code
/// blocks and filtering out headings that fail [`is_real_section_heading`].
pub fn extract_toc_headings(content: &str, denylist: &[String]) -> Vec<(usize, String)> {
    let mut headings = Vec::new();
    let mut in_code_block = false;

    for line in content.lines() {
        // Code fence (``` with optional language)
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            let level = caps[1].len();
            let title = caps[2].trim().to_string();

            if is_real_section_heading(&title, denylist) {
                headings.push((level, title));
            }
        }
    }

    headings
}

/// Filter out code comments that look like markdown headings.
///
/// Rejects titles starting with a denylisted lowercase prefix
/// (command-like bash comments), titles containing a path separator,
/// and titles containing code fragments.
pub fn is_real_section_heading(title: &str, denylist: &[String]) -> bool {
    let lower = title.to_lowercase();

    if denylist.iter().any(|prefix| lower.starts_with(prefix.as_str())) {
        return false;
    }

    if title.contains('/') {
        return false;
    }

    if CODE_MARKERS.iter().any(|marker| title.contains(marker)) {
        return false;
    }

    true
}

/// Render a `## Contents` block linking to the given headings.
///
/// Anchors follow the GitHub convention: lowercase, punctuation stripped,
/// whitespace collapsed to dashes. H2 entries are indented under H1s.
pub fn generate_toc(headings: &[(usize, String)]) -> String {
    let mut lines = vec!["## Contents".to_string(), String::new()];

    for (level, title) in headings {
        let indent = "  ".repeat(level - 1);
        lines.push(format!("{indent}- [{title}](#{})", anchor(title)));
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Build a heading anchor link target.
fn anchor(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = ANCHOR_STRIP_RE.replace_all(&lowered, "");
    WHITESPACE_RE
        .replace_all(stripped.trim(), "-")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillpress_shared::BundleConfig;

    fn denylist() -> Vec<String> {
        BundleConfig::default().heading_denylist
    }

    #[test]
    fn extracts_h1_and_h2_only() {
        let content = "# Top\n\n## Section\n\n### Too Deep\n\nText";
        let headings = extract_toc_headings(content, &denylist());
        assert_eq!(
            headings,
            vec![(1, "Top".to_string()), (2, "Section".to_string())]
        );
    }

    #[test]
    fn skips_headings_inside_code_fences() {
        let content = "# Real\n\n```bash\n# Install the tool\n## not a heading\n```\n\n## Also Real";
        let headings = extract_toc_headings(content, &denylist());
        assert_eq!(
            headings,
            vec![(1, "Real".to_string()), (2, "Also Real".to_string())]
        );
    }

    #[test]
    fn denylist_rejects_command_like_headings() {
        let deny = denylist();
        assert!(!is_real_section_heading("Install the CLI", &deny));
        assert!(!is_real_section_heading("run the tests", &deny));
        assert!(!is_real_section_heading("check deployment status", &deny));
        assert!(is_real_section_heading("Canister Lifecycle", &deny));
        assert!(is_real_section_heading("Error Handling", &deny));
    }

    #[test]
    fn paths_and_code_rejected() {
        let deny = denylist();
        assert!(!is_real_section_heading("src/main.rs", &deny));
        assert!(!is_real_section_heading("fn main()", &deny));
        assert!(!is_real_section_heading("a -> b", &deny));
        assert!(!is_real_section_heading("foo::bar", &deny));
        assert!(!is_real_section_heading("x = 1", &deny));
        assert!(!is_real_section_heading("struct Foo {", &deny));
    }

    #[test]
    fn custom_denylist_is_honored() {
        let deny = vec!["zebra".to_string()];
        assert!(!is_real_section_heading("Zebra Patterns", &deny));
        assert!(is_real_section_heading("Install the CLI", &deny));
    }

    #[test]
    fn generate_toc_renders_indented_list() {
        let headings = vec![
            (1, "Getting Started".to_string()),
            (2, "Error Handling".to_string()),
        ];
        let toc = generate_toc(&headings);
        assert!(toc.starts_with("## Contents\n"));
        assert!(toc.contains("- [Getting Started](#getting-started)"));
        assert!(toc.contains("  - [Error Handling](#error-handling)"));
    }

    #[test]
    fn anchor_strips_punctuation() {
        assert_eq!(anchor("What's New?"), "whats-new");
        assert_eq!(anchor("Cycles & Fees"), "cycles-fees");
        assert_eq!(anchor("  Spaced   Out  "), "spaced-out");
    }
}
