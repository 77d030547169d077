//! Sitemap retrieval and parsing.
//!
//! The sitemap is the single source of article URLs for a fetch run, so a
//! failure here is fatal to the run (unlike per-article failures, which are
//! recorded and skipped).

use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use tracing::{debug, instrument};

use skillpress_shared::{Result, SkillPressError};

/// Fetch the sitemap document and return all `<loc>` URLs in document order.
#[instrument(skip(client))]
pub async fn fetch_sitemap(client: &Client, sitemap_url: &str) -> Result<Vec<String>> {
    let response = client
        .get(sitemap_url)
        .send()
        .await
        .map_err(|e| SkillPressError::Network(format!("{sitemap_url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SkillPressError::Network(format!(
            "{sitemap_url}: HTTP {status}"
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SkillPressError::Network(format!("{sitemap_url}: failed to read body: {e}")))?;

    let urls = parse_sitemap(&body)?;
    debug!(url_count = urls.len(), "sitemap parsed");
    Ok(urls)
}

/// Parse sitemap XML, collecting the text of every `loc` element.
///
/// Matches on the local element name, so namespace-qualified sitemaps
/// (the standard `http://www.sitemaps.org/schemas/sitemap/0.9` schema) and
/// bare ones both work. No dedup, no URL-shape validation.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut in_loc = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
            }
            Ok(Event::Text(ref t)) if in_loc => {
                let text = t
                    .unescape()
                    .map_err(|e| SkillPressError::parse(format!("invalid sitemap XML: {e}")))?;
                urls.push(text.trim().to_string());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(SkillPressError::parse(format!("invalid sitemap XML: {e}")));
            }
        }
        buf.clear();
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_namespaced_sitemap_fixture() {
        let xml = std::fs::read_to_string(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/xml/sitemap.xml"),
        )
        .expect("read sitemap fixture");

        let urls = parse_sitemap(&xml).unwrap();
        assert_eq!(urls.len(), 3);
        assert_eq!(
            urls[0],
            "https://learn.internetcomputer.org/hc/articles/123-intro"
        );
        assert_eq!(urls[2], "https://learn.internetcomputer.org/");
    }

    #[test]
    fn parse_bare_sitemap() {
        let xml = r#"<?xml version="1.0"?>
<urlset>
  <url><loc>https://example.com/a</loc></url>
  <url><loc>https://example.com/b</loc></url>
</urlset>"#;

        let urls = parse_sitemap(xml).unwrap();
        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn parse_preserves_duplicates_and_order() {
        let xml = "<urlset><url><loc>https://example.com/a</loc></url><url><loc>https://example.com/a</loc></url></urlset>";
        let urls = parse_sitemap(xml).unwrap();
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn parse_malformed_xml_fails() {
        let result = parse_sitemap("<urlset><url><loc>https://example.com/a</url>");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fetch_sitemap_from_mock_server() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/hc/sitemap.xml"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(
                "<urlset><url><loc>https://example.com/page</loc></url></urlset>",
            ))
            .mount(&server)
            .await;

        let client = Client::new();
        let urls = fetch_sitemap(&client, &format!("{}/hc/sitemap.xml", server.uri()))
            .await
            .unwrap();
        assert_eq!(urls, vec!["https://example.com/page"]);
    }

    #[tokio::test]
    async fn fetch_sitemap_http_error_is_fatal() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/hc/sitemap.xml"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = Client::new();
        let result = fetch_sitemap(&client, &format!("{}/hc/sitemap.xml", server.uri())).await;
        assert!(matches!(result, Err(SkillPressError::Network(_))));
    }
}
