use std::time::Duration;

use log::{debug, trace};
use url::Url;

use crate::config::Config;
use crate::source::base::{FeedDocument, FeedSource, FetchError, RawPage};

/// Protocol version sent as `v=` on every request
pub const API_VERSION: u32 = 2;

static USER_AGENT: &str = concat!("ytstat/", env!("CARGO_PKG_VERSION"));

/// Client for the GData uploads feed. Owns its own HTTP session, so one is
/// made per run and passed to whatever needs it.
pub struct GDataClient {
    base: Url,
    session: attohttpc::Session,
    timeout: Duration,
}

impl GDataClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<GDataClient, FetchError> {
        let base = Url::parse(base_url).map_err(|_| FetchError::InvalidUrl(base_url.into()))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.into()));
        }

        let mut session = attohttpc::Session::new();
        session.header(attohttpc::header::USER_AGENT, USER_AGENT);

        Ok(GDataClient {
            base,
            session,
            timeout,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<GDataClient, FetchError> {
        GDataClient::new(&cfg.api_url, cfg.timeout)
    }

    /// `{base}/feeds/api/users/{username}/uploads`, with the username escaped
    fn uploads_url(&self, username: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(&["feeds", "api", "users", username, "uploads"]);
        }
        url
    }
}

impl FeedSource for GDataClient {
    fn fetch_page(
        &self,
        username: &str,
        start_index: usize,
        page_size: usize,
    ) -> Result<RawPage, FetchError> {
        let url = self.uploads_url(username);
        debug!(
            "Retrieving URL {} (start-index={}, max-results={})",
            &url, start_index, page_size
        );

        let http_err = |source: attohttpc::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let resp = self
            .session
            .get(url.as_str())
            .param("v", API_VERSION)
            .param("alt", "json")
            .param("start-index", start_index)
            .param("max-results", page_size)
            .timeout(self.timeout)
            .send()
            .map_err(http_err)?;

        if !resp.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let text = resp.text().map_err(http_err)?;
        trace!("Raw response: {}", &text);
        let doc: FeedDocument =
            serde_json::from_str(&text).map_err(|source| FetchError::Envelope {
                url: url.to_string(),
                source,
            })?;
        trace!("Raw deserialisation: {:?}", &doc);

        Ok(RawPage {
            entries: doc.feed.entry,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use mockito::Matcher;

    fn page_query(start: &str, size: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("v".into(), "2".into()),
            Matcher::UrlEncoded("alt".into(), "json".into()),
            Matcher::UrlEncoded("start-index".into(), start.into()),
            Matcher::UrlEncoded("max-results".into(), size.into()),
        ])
    }

    #[test]
    fn test_fetch_page() -> Result<()> {
        let mut server = mockito::Server::new();
        let m = server
            .mock("GET", "/feeds/api/users/andyshevchenko/uploads")
            .match_query(page_query("51", "50"))
            .with_header("content-type", "application/json")
            .with_body_from_file("testdata/uploads_page.json")
            .expect(1)
            .create();

        let client = GDataClient::new(&server.url(), Duration::from_secs(5))?;
        let page = client.fetch_page("andyshevchenko", 51, 50)?;

        assert_eq!(page.entries.len(), 3);
        let first = &page.entries[0];
        assert_eq!(
            first.id.as_ref().unwrap().text,
            "tag:youtube.com,2008:video:dQw4w9WgXcQ"
        );
        assert_eq!(
            first.statistics.as_ref().unwrap().view_count.as_deref(),
            Some("1024")
        );
        m.assert();
        Ok(())
    }

    #[test]
    fn test_feed_without_entries() -> Result<()> {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/feeds/api/users/nobody/uploads")
            .match_query(page_query("1", "50"))
            .with_body(r#"{"version": "1.0", "encoding": "UTF-8", "feed": {"title": {"$t": "Uploads by nobody"}}}"#)
            .create();

        let client = GDataClient::new(&server.url(), Duration::from_secs(5))?;
        let page = client.fetch_page("nobody", 1, 50)?;
        assert!(page.entries.is_empty());
        Ok(())
    }

    #[test]
    fn test_error_status() -> Result<()> {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/feeds/api/users/missing/uploads")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("User not found")
            .create();

        let client = GDataClient::new(&server.url(), Duration::from_secs(5))?;
        match client.fetch_page("missing", 1, 50) {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected status error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_garbage_body() -> Result<()> {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/feeds/api/users/someone/uploads")
            .match_query(Matcher::Any)
            .with_body("garbagenonsense")
            .create();

        let client = GDataClient::new(&server.url(), Duration::from_secs(5))?;
        let result = client.fetch_page("someone", 1, 50);
        assert!(matches!(result, Err(FetchError::Envelope { .. })));
        Ok(())
    }

    #[test]
    fn test_uploads_url_escapes_username() -> Result<()> {
        let client = GDataClient::new("http://example.com/", Duration::from_secs(5))?;
        assert_eq!(
            client.uploads_url("some user/x").as_str(),
            "http://example.com/feeds/api/users/some%20user%2Fx/uploads"
        );
        Ok(())
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            GDataClient::new("not a url", Duration::from_secs(5)),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            GDataClient::new("mailto:someone@example.com", Duration::from_secs(5)),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
