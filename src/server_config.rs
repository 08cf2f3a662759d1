use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DevServerError;

pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// `true` listens on every interface, `false` only on loopback.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(untagged)]
pub enum HostSetting {
  Enabled(bool),
  Address(String),
}

impl HostSetting {
  pub fn bind_address(&self) -> &str {
    match self {
      HostSetting::Enabled(true) => "0.0.0.0",
      HostSetting::Enabled(false) => "localhost",
      HostSetting::Address(address) => address.as_str(),
    }
  }
}

impl Default for HostSetting {
  fn default() -> Self {
    HostSetting::Enabled(true)
  }
}

impl FromStr for HostSetting {
  type Err = Infallible;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.to_lowercase().as_str() {
      "true" => Ok(HostSetting::Enabled(true)),
      "false" => Ok(HostSetting::Enabled(false)),
      _ => Ok(HostSetting::Address(value.to_string())),
    }
  }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PathRewrite {
  pub from: String,
  pub to: String,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ProxyRuleConfig {
  pub prefix: String,
  pub target: String,
  #[serde(default)]
  pub change_origin: bool,
  #[serde(default)]
  pub rewrite: Option<PathRewrite>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct DevServerConfig {
  pub port: u16,
  pub strict_port: bool,
  pub host: HostSetting,
  pub workers: usize,
  /// Directory static files are served from.
  pub root: PathBuf,
  pub alias: BTreeMap<String, PathBuf>,
  pub proxy: Vec<ProxyRuleConfig>,
}

impl Default for DevServerConfig {
  fn default() -> Self {
    DevServerConfig {
      port: DEFAULT_PORT,
      strict_port: false,
      host: HostSetting::default(),
      workers: DEFAULT_WORKER_COUNT,
      root: PathBuf::from("."),
      alias: BTreeMap::from([("@".to_string(), PathBuf::from("./src"))]),
      proxy: vec![ProxyRuleConfig {
        prefix: "/api".to_string(),
        target: "http://localhost:4000".to_string(),
        change_origin: true,
        rewrite: None,
      }],
    }
  }
}

impl DevServerConfig {
  pub fn load_from_file(path: &Path) -> Result<DevServerConfig, DevServerError> {
    let file = File::open(path).map_err(|source| DevServerError::ConfigRead {
      path: path.to_path_buf(),
      source,
    })?;

    Self::load_from_reader(file)
  }

  pub fn load_from_reader<R: std::io::Read>(reader: R) -> Result<DevServerConfig, DevServerError> {
    let config: DevServerConfig = serde_yaml::from_reader(reader)?;
    Ok(config)
  }
}
