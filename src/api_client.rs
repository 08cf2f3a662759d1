use std::env;
use std::time::Duration;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};

pub const API_URL_VAR: &str = "VITE_API_URL";
pub const ORIGIN_VAR: &str = "API_CLIENT_ORIGIN";

/// Root-relative path used when no override is supplied. The dev server
/// forwards it to the backend.
pub const FALLBACK_BASE_URL: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
  pub base_url: String,
  /// Origin that root-relative base URLs are resolved against.
  pub origin: String,
}

impl ApiClientConfig {
  pub fn from_env() -> ApiClientConfig {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> ApiClientConfig
  where
    F: Fn(&str) -> Option<String>,
  {
    let base_url = resolve_base_url(lookup(API_URL_VAR));
    let origin = lookup(ORIGIN_VAR)
      .filter(|value| !value.is_empty())
      .unwrap_or_else(|| DEFAULT_ORIGIN.into());

    ApiClientConfig { base_url, origin }
  }

  pub fn to_client(self) -> Result<ApiClient, reqwest::Error> {
    self.build_client(REQUEST_TIMEOUT)
  }

  fn build_client(self, timeout: Duration) -> Result<ApiClient, reqwest::Error> {
    let ApiClientConfig { base_url, origin } = self;
    let client = reqwest::ClientBuilder::new()
      .timeout(timeout)
      .build()?;

    debug!("API client targets '{}' (origin '{}').", &base_url, &origin);

    Ok(ApiClient {
      client,
      timeout,
      base_url: Box::from(base_url.as_str()),
      origin: Box::from(origin.as_str()),
    })
  }
}

/// Uses the override verbatim when it is present and non-empty.
pub fn resolve_base_url(value: Option<String>) -> String {
  match value {
    Some(url) if !url.is_empty() => url,
    _ => FALLBACK_BASE_URL.to_string(),
  }
}

pub struct ApiClient {
  client: Client,
  timeout: Duration,
  base_url: Box<str>,
  origin: Box<str>,
}

impl ApiClient {
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  /// Absolute URL a request for `path` is sent to.
  pub fn url_for(&self, path: &str) -> String {
    let url = if is_absolute_url(path) {
      path.to_string()
    } else {
      combine_urls(&self.base_url, path)
    };

    if is_absolute_url(&url) {
      url
    } else {
      combine_urls(&self.origin, &url)
    }
  }

  pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.client.request(method, self.url_for(path))
  }

  pub async fn send(&self, builder: RequestBuilder) -> Result<Response, reqwest::Error> {
    pass_through(builder.send().await)
  }
}

/// Response hook. Statuses are not inspected and errors go back to the caller
/// untouched.
#[inline]
pub fn pass_through(result: Result<Response, reqwest::Error>) -> Result<Response, reqwest::Error> {
  result
}

fn is_absolute_url(url: &str) -> bool {
  if url.starts_with("//") {
    return true;
  }

  match url.split_once("://") {
    Some((scheme, _)) => {
      let mut chars = scheme.chars();
      matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    }
    None => false,
  }
}

fn combine_urls(base: &str, relative: &str) -> String {
  if relative.is_empty() {
    return base.to_string();
  }

  format!(
    "{}/{}",
    base.trim_end_matches('/'),
    relative.trim_start_matches('/')
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::spawn_backend;
  use pretty_assertions::assert_eq;
  use reqwest::StatusCode;

  fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
      pairs
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.to_string())
    }
  }

  #[test]
  fn override_is_used_verbatim() {
    let config = ApiClientConfig::from_lookup(lookup_from(&[(API_URL_VAR, "https://api.example.com/v2/")]));
    assert_eq!(config.base_url, "https://api.example.com/v2/");
  }

  #[test]
  fn missing_or_empty_override_falls_back() {
    let unset = ApiClientConfig::from_lookup(lookup_from(&[]));
    let empty = ApiClientConfig::from_lookup(lookup_from(&[(API_URL_VAR, "")]));

    assert_eq!(unset.base_url, "/api");
    assert_eq!(empty.base_url, "/api");
    assert_eq!(unset.origin, DEFAULT_ORIGIN);
  }

  #[test]
  fn timeout_does_not_depend_on_base_url() {
    let fallback = ApiClientConfig::from_lookup(lookup_from(&[])).to_client().unwrap();
    let explicit = ApiClientConfig::from_lookup(lookup_from(&[(API_URL_VAR, "http://10.0.0.1:4000")]))
      .to_client()
      .unwrap();

    assert_eq!(fallback.timeout(), Duration::from_millis(10_000));
    assert_eq!(explicit.timeout(), Duration::from_millis(10_000));
  }

  #[test]
  fn relative_base_is_resolved_against_origin() {
    let client = ApiClientConfig::from_lookup(lookup_from(&[])).to_client().unwrap();

    assert_eq!(client.base_url(), "/api");
    assert_eq!(client.url_for("/widgets"), "http://localhost:5173/api/widgets");
    assert_eq!(client.url_for("widgets?page=2"), "http://localhost:5173/api/widgets?page=2");
    assert_eq!(client.url_for(""), "http://localhost:5173/api");
  }

  #[test]
  fn absolute_paths_bypass_base() {
    let client = ApiClientConfig::from_lookup(lookup_from(&[(API_URL_VAR, "http://backend:4000/api/")]))
      .to_client()
      .unwrap();

    assert_eq!(client.url_for("/users/1"), "http://backend:4000/api/users/1");
    assert_eq!(client.url_for("https://other.test/x"), "https://other.test/x");
    assert!(is_absolute_url("//cdn.test/lib.js"));
    assert!(!is_absolute_url("/api/x"));
    assert!(!is_absolute_url("1http://x"));
  }

  #[actix_web::test]
  async fn request_errors_are_returned_unchanged() {
    let client = ApiClientConfig {
      base_url: "http://bad host/api".into(),
      origin: DEFAULT_ORIGIN.into(),
    }
    .to_client()
    .unwrap();

    let error = client.send(client.request(Method::GET, "/widgets")).await.unwrap_err();
    assert!(error.is_builder());

    let message = error.to_string();
    let forwarded = pass_through(Err(error)).unwrap_err();
    assert!(forwarded.is_builder());
    assert_eq!(forwarded.to_string(), message);
  }

  #[actix_web::test]
  async fn timeouts_surface_as_timeout_errors() {
    let backend = spawn_backend().await;
    let client = ApiClientConfig {
      base_url: format!("http://{}/api", backend),
      origin: DEFAULT_ORIGIN.into(),
    }
    .build_client(Duration::from_millis(200))
    .unwrap();

    assert_eq!(client.timeout(), Duration::from_millis(200));

    let error = client.send(client.request(Method::GET, "/slow")).await.unwrap_err();
    assert!(error.is_timeout());
    assert!(error.url().is_some_and(|url| url.path() == "/api/slow"));
  }

  #[actix_web::test]
  async fn error_statuses_are_not_translated() {
    let backend = spawn_backend().await;
    let client = ApiClientConfig {
      base_url: format!("http://{}/api", backend),
      origin: DEFAULT_ORIGIN.into(),
    }
    .to_client()
    .unwrap();

    let response = client.send(client.request(Method::GET, "/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "missing");
  }
}
