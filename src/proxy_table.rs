use std::sync::Arc;

use log::info;

use crate::error::DevServerError;
use crate::proxy_service::proxy_config::ProxyRule;
use crate::server_config::ProxyRuleConfig;

/// Forwarding rules in configuration order. The first matching prefix wins.
pub struct ProxyTable {
  rules: Vec<Arc<ProxyRule>>,
}

impl ProxyTable {
  pub fn from_config(config: &[ProxyRuleConfig]) -> Result<ProxyTable, DevServerError> {
    let mut rules: Vec<Arc<ProxyRule>> = Vec::with_capacity(config.len());

    for config_item in config.iter().cloned() {
      let rule = ProxyRule::try_from(config_item)?;
      info!(
        "Proxy rule created '{}' -> '{}' (change origin: {}).",
        &rule.prefix,
        rule.target.as_str().trim_end_matches('/'),
        rule.change_origin()
      );
      rules.push(Arc::new(rule));
    }

    Ok(ProxyTable { rules })
  }

  pub fn find(&self, path: &str) -> Option<&Arc<ProxyRule>> {
    self.rules.iter().find(|rule| rule.matches(path))
  }

  pub fn rules(&self) -> &[Arc<ProxyRule>] {
    &self.rules
  }

  /// True when `rule` is the one that handles `path`.
  pub fn routes_to(&self, path: &str, rule: &Arc<ProxyRule>) -> bool {
    self.find(path).is_some_and(|found| Arc::ptr_eq(found, rule))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::server_config::DevServerConfig;

  fn rule(prefix: &str, target: &str) -> ProxyRuleConfig {
    ProxyRuleConfig {
      prefix: prefix.into(),
      target: target.into(),
      change_origin: false,
      rewrite: None,
    }
  }

  #[test]
  fn default_table_forwards_api_only() {
    let table = ProxyTable::from_config(&DevServerConfig::default().proxy).unwrap();

    let found = table.find("/api/widgets").unwrap();
    assert_eq!(found.forward_url("/api/widgets"), "http://localhost:4000/api/widgets");
    assert!(table.find("/index.html").is_none());
    assert!(table.find("/").is_none());
  }

  #[test]
  fn first_matching_rule_wins() {
    let table = ProxyTable::from_config(&[
      rule("/api/auth", "http://localhost:5000"),
      rule("/api", "http://localhost:4000"),
    ])
    .unwrap();

    let auth = &table.rules()[0];
    let api = &table.rules()[1];

    assert!(table.routes_to("/api/auth/login", auth));
    assert!(!table.routes_to("/api/auth/login", api));
    assert!(table.routes_to("/api/users", api));
  }

  #[test]
  fn invalid_rule_fails_the_table() {
    let result = ProxyTable::from_config(&[rule("/api", "not a url")]);
    assert!(matches!(result, Err(DevServerError::InvalidTarget { .. })));
  }
}
