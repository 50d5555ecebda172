pub mod parse;

use std::time::Duration;

use tracing::{info, warn};

pub use parse::{parse, ParseError, ParsedResume, ResumeEntry};

/// Hard per-request limit for the résumé fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, PartialEq, Eq)]
pub enum ResumeFetch {
    Document(String),
    Unavailable(String),
}

/// GitHub `blob` pages wrap the file in UI chrome; fetch the raw file instead.
pub fn raw_url(url: &str) -> String {
    if url.contains("github.com") && url.contains("/blob/") {
        url.replacen("github.com", "raw.githubusercontent.com", 1)
            .replacen("/blob/", "/", 1)
    } else {
        url.to_string()
    }
}

pub async fn fetch_document(url: &str, timeout: Duration) -> ResumeFetch {
    let url = raw_url(url);
    info!("Fetching resume from: {}", url);

    let client = match reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("site_tiles/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(c) => c,
        Err(e) => return unavailable(format!("could not build HTTP client: {e}")),
    };

    let response = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => return unavailable(format!("request failed: {e}")),
    };

    let status = response.status();
    if !status.is_success() {
        return unavailable(format!("status {status}"));
    }

    match response.text().await {
        Ok(body) => {
            info!("Resume fetched ({} bytes)", body.len());
            ResumeFetch::Document(body)
        }
        Err(e) => unavailable(format!("could not read body: {e}")),
    }
}

fn unavailable(reason: String) -> ResumeFetch {
    warn!("Failed to fetch resume: {}", reason);
    ResumeFetch::Unavailable(reason)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn blob_urls_become_raw() {
        assert_eq!(
            raw_url("https://github.com/octo/cv/blob/main/index.html"),
            "https://raw.githubusercontent.com/octo/cv/main/index.html"
        );
        assert_eq!(raw_url("https://example.com/cv.html"), "https://example.com/cv.html");
    }

    #[tokio::test]
    async fn fetches_document_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cv.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let fetched = fetch_document(&format!("{}/cv.html", server.uri()), FETCH_TIMEOUT).await;
        assert_eq!(fetched, ResumeFetch::Document("<html></html>".into()));
    }

    #[tokio::test]
    async fn non_success_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetched = fetch_document(&format!("{}/cv.html", server.uri()), FETCH_TIMEOUT).await;
        assert!(matches!(fetched, ResumeFetch::Unavailable(r) if r.contains("404")));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html></html>")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let fetched = fetch_document(&server.uri(), Duration::from_millis(50)).await;
        assert!(matches!(fetched, ResumeFetch::Unavailable(_)));
    }
}
