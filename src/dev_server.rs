use std::io::ErrorKind;
use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{guard, web, App, HttpServer};
use log::{info, warn};
use reqwest::Client;

use crate::error::DevServerError;
use crate::http_client::HttpClientConfig;
use crate::proxy_service::proxy_factory::ProxyRouteServiceFactory;
use crate::proxy_table::ProxyTable;
use crate::server_config::DevServerConfig;
use crate::static_files::{self, StaticSite};

/// Everything the per-worker app factory needs.
#[derive(Clone)]
pub struct AppState {
  proxy_table: Arc<ProxyTable>,
  http_client: Client,
  site: web::Data<StaticSite>,
}

impl AppState {
  pub fn new(config: &DevServerConfig, client_config: HttpClientConfig) -> Result<AppState, DevServerError> {
    let proxy_table = ProxyTable::from_config(&config.proxy)?;
    let http_client = client_config.to_client()?;

    Ok(AppState {
      proxy_table: Arc::new(proxy_table),
      http_client,
      site: web::Data::new(StaticSite::new(&config.root, &config.alias)),
    })
  }

  pub fn configure(&self, cfg: &mut web::ServiceConfig) {
    for rule in self.proxy_table.rules() {
      let owner = rule.clone();
      let table = self.proxy_table.clone();

      cfg.service(
        web::resource("/{tail:.*}")
          .guard(guard::fn_guard(move |ctx| table.routes_to(ctx.head().uri.path(), &owner)))
          .default_service(ProxyRouteServiceFactory::create(self.http_client.clone(), rule.clone())),
      );
    }

    cfg.app_data(self.site.clone());
    cfg.default_service(web::to(static_files::serve));
  }
}

/// Binds `host:port`, moving on to the next port while it is taken unless
/// `strict_port` is set.
pub fn bind_listener(host: &str, port: u16, strict_port: bool) -> Result<TcpListener, DevServerError> {
  let mut candidate = port;

  loop {
    match TcpListener::bind((host, candidate)) {
      Ok(listener) => return Ok(listener),
      Err(err) if err.kind() == ErrorKind::AddrInUse && !strict_port => {
        warn!("Port {} is in use, trying another one...", candidate);
        candidate = candidate
          .checked_add(1)
          .ok_or(DevServerError::PortsExhausted(port))?;
      }
      Err(source) => {
        return Err(DevServerError::Bind {
          host: host.to_string(),
          port: candidate,
          source,
        })
      }
    }
  }
}

pub async fn run(config: DevServerConfig, client_config: HttpClientConfig) -> Result<(), DevServerError> {
  let state = AppState::new(&config, client_config)?;
  let host = config.host.bind_address();
  let listener = bind_listener(host, config.port, config.strict_port)?;

  let local_port = listener
    .local_addr()
    .map(|addr| addr.port())
    .unwrap_or(config.port);
  info!("Dev server listening on http://{}:{}/", host, local_port);

  HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      .wrap(Cors::permissive())
      .configure(|cfg| state.configure(cfg))
  })
    .workers(config.workers)
    .listen(listener)
    .map_err(DevServerError::Server)?
    .run()
    .await
    .map_err(DevServerError::Server)
}
