use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Url;

use crate::error::DevServerError;
use crate::proxy_service::proxy_config::{authority, ProxyRule};
use crate::server_config::ProxyRuleConfig;

pub mod proxy_route_service;
pub mod proxy_factory;
pub mod proxy_config;

impl TryFrom<ProxyRuleConfig> for ProxyRule {
  type Error = DevServerError;

  fn try_from(config: ProxyRuleConfig) -> Result<Self, Self::Error> {
    let ProxyRuleConfig {
      prefix,
      target,
      change_origin,
      rewrite,
    } = config;

    if !prefix.starts_with('/') {
      return Err(DevServerError::InvalidPrefix(prefix));
    }

    let invalid_target = || DevServerError::InvalidTarget {
      prefix: prefix.clone(),
      target: target.clone(),
    };

    let target_url = Url::parse(&target).map_err(|_| invalid_target())?;
    if !matches!(target_url.scheme(), "http" | "https") {
      return Err(invalid_target());
    }

    let host_header = if change_origin {
      let host = authority(&target_url).ok_or_else(invalid_target)?;
      Some(HeaderValue::from_str(&host).map_err(|_| invalid_target())?)
    } else {
      None
    };

    Ok(ProxyRule {
      prefix: Box::from(prefix.as_str()),
      target: target_url,
      host_header,
      rewrite,
    })
  }
}

/// Connection-scoped headers that must not cross the proxy.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
  matches!(
    name.as_str(),
    "connection"
      | "keep-alive"
      | "proxy-authenticate"
      | "proxy-authorization"
      | "te"
      | "trailer"
      | "transfer-encoding"
      | "upgrade"
  )
}

/// Headers the proxy sets itself instead of copying.
pub fn is_recomputed(name: &HeaderName) -> bool {
  matches!(name.as_str(), "host" | "content-length")
}
