//! URL → filesystem path mapping for the cache and output trees.
//!
//! Both mappings are pure functions of the URL: the same URL always yields
//! the same paths, across runs. The cache mirrors each URL's path with a
//! `.html` default extension; the output tree forces `.md`.

use std::path::{Path, PathBuf};

use url::Url;

/// Sentinel file name substituted for an empty URL path (the bare domain root).
const INDEX_NAME: &str = "index";

/// Map a URL to its raw-HTML cache file path under `cache_root`.
///
/// The URL's path component is stripped of leading/trailing slashes; an
/// empty path becomes `index`; a name without a file extension gets `.html`
/// appended.
pub fn cache_path(url: &str, cache_root: &Path) -> PathBuf {
    let rel = url_rel_path(url);
    if Path::new(&rel).extension().is_none() {
        cache_root.join(format!("{rel}.html"))
    } else {
        cache_root.join(rel)
    }
}

/// Map a URL to its converted-markdown output path under `output_root`.
///
/// Same parsing as [`cache_path`], but the extension is always `.md`,
/// replacing any existing extension rather than appending.
pub fn output_path(url: &str, output_root: &Path) -> PathBuf {
    let rel = url_rel_path(url);
    output_root.join(Path::new(&rel).with_extension("md"))
}

/// Extract the slash-trimmed path component of a URL, with the `index`
/// sentinel for empty paths. Unparseable input is used as-is.
fn url_rel_path(url: &str) -> String {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string());

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        INDEX_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
