use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevServerError {
  #[error("unable to read config file '{path}': {source}")]
  ConfigRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config file: {0}")]
  ConfigParse(#[from] serde_yaml::Error),

  #[error("invalid proxy target '{target}' for prefix '{prefix}'")]
  InvalidTarget { prefix: String, target: String },

  #[error("proxy prefix '{0}' must start with '/'")]
  InvalidPrefix(String),

  #[error("unable to build http client: {0}")]
  HttpClient(#[from] reqwest::Error),

  #[error("unable to bind {host}:{port}: {source}")]
  Bind {
    host: String,
    port: u16,
    #[source]
    source: std::io::Error,
  },

  #[error("no free port available starting from {0}")]
  PortsExhausted(u16),

  #[error("dev server stopped: {0}")]
  Server(#[source] std::io::Error),
}

impl From<DevServerError> for std::io::Error {
  fn from(value: DevServerError) -> Self {
    let kind = match &value {
      DevServerError::ConfigRead { source, .. }
      | DevServerError::Bind { source, .. }
      | DevServerError::Server(source) => source.kind(),
      _ => ErrorKind::Other,
    };

    std::io::Error::new(kind, value)
  }
}
