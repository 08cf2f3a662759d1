use reqwest::header::HeaderValue;
use reqwest::Url;

use crate::server_config::PathRewrite;

/// A compiled forwarding rule.
pub struct ProxyRule {
  pub prefix: Box<str>,
  pub target: Url,
  /// `Host` sent upstream when origin rewriting is enabled.
  pub host_header: Option<HeaderValue>,
  pub rewrite: Option<PathRewrite>,
}

impl ProxyRule {
  pub fn matches(&self, path: &str) -> bool {
    path.starts_with(self.prefix.as_ref())
  }

  pub fn change_origin(&self) -> bool {
    self.host_header.is_some()
  }

  /// Upstream URL for an incoming path and query.
  pub fn forward_url(&self, path_and_query: &str) -> String {
    let path = match &self.rewrite {
      Some(PathRewrite { from, to }) => match path_and_query.strip_prefix(from.as_str()) {
        Some(rest) => format!("{}{}", to, rest),
        None => path_and_query.to_string(),
      },
      None => path_and_query.to_string(),
    };

    let separator = if path.starts_with('/') { "" } else { "/" };
    format!("{}{}{}", self.target.as_str().trim_end_matches('/'), separator, path)
  }
}

pub fn authority(url: &Url) -> Option<String> {
  let host = url.host_str()?;

  match url.port() {
    Some(port) => Some(format!("{}:{}", host, port)),
    None => Some(host.to_string()),
  }
}
