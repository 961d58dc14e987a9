//! HTTP fetching for seed actors
//!
//! One client is shared by every actor; the scheduler rebuilds it when the
//! proxy settings change and swaps it into the shared slot. Redirects are
//! followed manually so that a redirect re-issues the fetch without counting
//! against the seed's backoff interval.

use crate::config::ProxySettings;
use reqwest::{header, redirect::Policy, Client, Proxy};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

/// Slot holding the process-wide HTTP client
///
/// reqwest clients are cheap to clone; actors clone out of the slot per
/// fetch so a swapped-in client takes effect on the next request.
pub type SharedClient = Arc<RwLock<Client>>;

/// A completed fetch: the body plus the URL that finally served it
#[derive(Debug)]
pub struct FetchSuccess {
    pub final_url: Url,
    pub body: String,
}

/// A failed fetch, described the way it is recorded as a broken link
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Network(String),
}

/// Builds the shared HTTP client with the given proxy applied process-wide
pub fn build_client(proxy: &ProxySettings) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(concat!("rove/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::none())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(url) = proxy.url() {
        let mut p = Proxy::all(&url)?;
        if !proxy.user.is_empty() {
            p = p.basic_auth(&proxy.user, &proxy.password);
        }
        builder = builder.proxy(p);
    }

    builder.build()
}

/// Fetches a URL, following redirects by re-issuing the request
///
/// Relative redirect targets resolve against the URL that produced them.
/// There is no hop limit here; the caller bounds the whole fetch with the
/// abort timeout, which also covers redirect loops.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchSuccess, FetchError> {
    let mut current = url.clone();

    loop {
        let response = client
            .get(current.clone())
            .send()
            .await
            .map_err(describe_error)?;
        let status = response.status();

        if status.is_redirection() {
            let target = response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|location| current.join(location).ok());

            match target {
                Some(next) => {
                    tracing::debug!("redirected {} -> {}", current, next);
                    current = next;
                    continue;
                }
                None => {
                    return Err(FetchError::Network(
                        "redirect without a usable Location header".to_string(),
                    ))
                }
            }
        }

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(describe_error)?;
        return Ok(FetchSuccess {
            final_url: current,
            body,
        });
    }
}

fn describe_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Network("request timeout".to_string())
    } else if e.is_connect() {
        FetchError::Network(format!("connection failed: {}", e))
    } else {
        FetchError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_client_without_proxy() {
        assert!(build_client(&ProxySettings::default()).is_ok());
    }

    #[test]
    fn test_build_client_with_http_proxy() {
        let proxy = ProxySettings {
            kind: ProxyKind::Http,
            host: "127.0.0.1".to_string(),
            port: 8080,
            user: "u".to_string(),
            password: "p".to_string(),
        };
        assert!(build_client(&proxy).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<title>Hi</title>"))
            .mount(&server)
            .await;

        let client = build_client(&ProxySettings::default()).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let fetched = fetch_page(&client, &url).await.unwrap();
        assert!(fetched.body.contains("Hi"));
        assert_eq!(fetched.final_url, url);
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/target"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/target"))
            .respond_with(ResponseTemplate::new(200).set_body_string("landed"))
            .mount(&server)
            .await;

        let client = build_client(&ProxySettings::default()).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let fetched = fetch_page(&client, &url).await.unwrap();
        assert_eq!(fetched.body, "landed");
        assert!(fetched.final_url.as_str().ends_with("/target"));
    }

    #[tokio::test]
    async fn test_http_error_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_client(&ProxySettings::default()).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let err = fetch_page(&client, &url).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[tokio::test]
    async fn test_redirect_without_location_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(302))
            .mount(&server)
            .await;

        let client = build_client(&ProxySettings::default()).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        assert!(fetch_page(&client, &url).await.is_err());
    }
}
