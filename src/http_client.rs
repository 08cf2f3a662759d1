use std::env;

use reqwest::redirect::Policy;
use reqwest::Client;

/// Options for the client that forwards proxied requests to the backend.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
  pub http_proxy: Option<String>,
  pub user: Option<String>,
  pub pass: Option<String>,
  pub enable_cookies: bool,
}

impl HttpClientConfig {
  pub fn from_env() -> HttpClientConfig {
    let http_proxy = env::var("HTTP_PROXY_URL").ok();
    let user = env::var("HTTP_PROXY_USER").ok();
    let pass = env::var("HTTP_PROXY_PASS").ok();
    let enable_cookies = env::var("HTTP_PROXY_COOKIES").map_or(false, |e| e.parse::<bool>().unwrap_or(false));

    HttpClientConfig {
      http_proxy,
      user,
      pass,
      enable_cookies,
    }
  }

  pub fn to_client(self) -> Result<Client, reqwest::Error> {
    let HttpClientConfig {
      http_proxy,
      user,
      pass,
      enable_cookies,
    } = self;
    let mut client_builder = reqwest::ClientBuilder::new();

    if let Some(proxy_url) = http_proxy {
      let mut proxy = reqwest::Proxy::all(proxy_url)?;

      if let (Some(user_name), Some(password)) = (user, pass) {
        proxy = proxy.basic_auth(&user_name, &password);
      }

      client_builder = client_builder.proxy(proxy);
    } else {
      // the backend is local, system proxy settings would only get in the way
      client_builder = client_builder.no_proxy();
    }

    if enable_cookies {
      client_builder = client_builder.cookie_store(true);
    }

    // redirects belong to the browser
    let client = client_builder.redirect(Policy::none()).build()?;

    Ok(client)
  }
}
