//! Plain HTTP engine
//!
//! Serves wikis without bot mitigation, and lets the crawler be exercised
//! against local mock servers.

use crate::browser::{with_timeout, Browser, BrowserError, LaunchOptions, Page};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client that presents itself like a desktop browser
///
/// # Arguments
///
/// * `user_agent` - The user agent string to send
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use handbook_scraper::browser::build_http_client;
/// use handbook_scraper::config::DEFAULT_USER_AGENT;
///
/// let client = build_http_client(DEFAULT_USER_AGENT).unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,image/avif,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

pub struct HttpBrowser {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpBrowser {
    pub fn new(options: &LaunchOptions) -> Result<Self, BrowserError> {
        let client = build_http_client(&options.user_agent)?;
        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            timeout: self.timeout,
            document: Mutex::new(None),
        }))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        Ok(())
    }
}

/// A "tab" that remembers the last document it loaded
pub struct HttpPage {
    client: Client,
    timeout: Option<Duration>,
    document: Mutex<Option<String>>,
}

impl HttpPage {
    /// Fetches `url` and reads the whole body inside the navigation timeout
    async fn get(&self, url: &Url) -> Result<Vec<u8>, BrowserError> {
        let request = async {
            let response = self.client.get(url.clone()).send().await.map_err(|e| {
                if e.is_timeout() {
                    BrowserError::Timeout {
                        url: url.to_string(),
                        seconds: self.timeout.map(|t| t.as_secs()).unwrap_or_default(),
                    }
                } else {
                    BrowserError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(BrowserError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            Ok(response.bytes().await?.to_vec())
        };
        with_timeout(self.timeout, url, request).await
    }
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(&self, url: &Url) -> Result<(), BrowserError> {
        let body = String::from_utf8_lossy(&self.get(url).await?).into_owned();

        if let Ok(mut document) = self.document.lock() {
            *document = Some(body);
        }
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.document
            .lock()
            .ok()
            .and_then(|document| document.clone())
            .ok_or(BrowserError::NoPage)
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, BrowserError> {
        self.get(url).await
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Engine;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options() -> LaunchOptions {
        LaunchOptions {
            engine: Engine::Http,
            headless: true,
            executable: None,
            user_agent: "TestAgent/1.0".to_string(),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client("TestAgent/1.0").is_ok());
    }

    #[tokio::test]
    async fn test_content_before_goto_is_no_page() {
        let browser = HttpBrowser::new(&options()).unwrap();
        let page = browser.new_page().await.unwrap();
        assert!(matches!(page.content().await, Err(BrowserError::NoPage)));
    }

    #[tokio::test]
    async fn test_goto_then_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiki/Crowbar"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Crowbar</h1>"))
            .mount(&server)
            .await;

        let browser = HttpBrowser::new(&options()).unwrap();
        let page = browser.new_page().await.unwrap();
        let url = Url::parse(&format!("{}/wiki/Crowbar", server.uri())).unwrap();

        page.goto(&url).await.unwrap();
        assert_eq!(page.content().await.unwrap(), "<h1>Crowbar</h1>");
        page.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let browser = HttpBrowser::new(&options()).unwrap();
        let page = browser.new_page().await.unwrap();
        let url = Url::parse(&format!("{}/wiki/Missing", server.uri())).unwrap();

        let err = page.goto(&url).await.unwrap_err();
        assert!(matches!(err, BrowserError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let mut opts = options();
        opts.timeout = Some(Duration::from_millis(200));
        let browser = HttpBrowser::new(&opts).unwrap();
        let page = browser.new_page().await.unwrap();
        let url = Url::parse(&format!("{}/wiki/Slow", server.uri())).unwrap();

        let err = page.goto(&url).await.unwrap_err();
        assert!(err.is_timeout());
    }

    /// Serves response headers at once, then stalls before the body
    async fn stalled_body_server() -> Url {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let _ = socket
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\n<html>")
                        .await;
                    tokio::time::sleep(Duration::from_secs(5)).await;
                });
            }
        });
        Url::parse(&format!("http://{}/wiki/Stalled", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_slow_body_counts_against_timeout() {
        let url = stalled_body_server().await;
        let mut opts = options();
        opts.timeout = Some(Duration::from_millis(300));
        let browser = HttpBrowser::new(&opts).unwrap();
        let page = browser.new_page().await.unwrap();

        let started = std::time::Instant::now();
        assert!(page.goto(&url).await.unwrap_err().is_timeout());
        assert!(page.fetch_bytes(&url).await.unwrap_err().is_timeout());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images/Crowbar.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .mount(&server)
            .await;

        let browser = HttpBrowser::new(&options()).unwrap();
        let page = browser.new_page().await.unwrap();
        let url = Url::parse(&format!("{}/images/Crowbar.png", server.uri())).unwrap();

        assert_eq!(page.fetch_bytes(&url).await.unwrap(), vec![0x89, b'P', b'N', b'G']);
    }
}
