use std::time::Duration;

use log::warn;
use reqwest::blocking::Client;

use crate::error::HarvestError;

/// Blocking page fetcher with a fixed per-request timeout.
///
/// The client is built once and reused for every request of a crawl.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Single GET attempt. Network errors, timeouts and non-success statuses
    /// are logged and collapse to `None`; nothing propagates past here.
    pub fn fetch(&self, url: &str) -> Option<String> {
        let result = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text());
        match result {
            Ok(body) => Some(body),
            Err(err) => {
                warn!("could not fetch {url}: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Duration::from_secs(5), "Mozilla/5.0").unwrap()
    }

    #[test]
    fn returns_body_on_success() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/side")
            .with_status(200)
            .with_body("<html>hej</html>")
            .create();

        let body = fetcher().fetch(&format!("{}/side", server.url()));
        assert_eq!(body.as_deref(), Some("<html>hej</html>"));
    }

    #[test]
    fn non_success_status_is_none() {
        let mut server = mockito::Server::new();
        let _m = server.mock("GET", "/borte").with_status(404).create();

        assert!(fetcher().fetch(&format!("{}/borte", server.url())).is_none());
    }

    #[test]
    fn unreachable_host_is_none() {
        // reserved TEST-NET address, nothing listens there
        let fetcher = PageFetcher::new(Duration::from_millis(250), "Mozilla/5.0").unwrap();
        assert!(fetcher.fetch("http://192.0.2.1:9/x").is_none());
    }
}
