use std::sync::Arc;
use actix_web::{dev, HttpRequest, HttpResponse, ResponseError};
use actix_web::body::BoxBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse};
use bytes::BytesMut;
use futures_core::future::LocalBoxFuture;
use futures_util::StreamExt;
use log::{debug, error};
use reqwest::header::{HeaderMap, HOST};
use reqwest::{Client, RequestBuilder, Response};
use crate::proxy_service::proxy_config::ProxyRule;
use crate::proxy_service::{is_hop_by_hop, is_recomputed};

pub struct ProxyRouteService {
  pub(super) rule: Arc<ProxyRule>,
  pub(super) http_client: Client,
}

impl Service<ServiceRequest> for ProxyRouteService {
  type Response = ServiceResponse;
  type Error = actix_web::Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  dev::always_ready!();

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let (http_request, payload) = req.into_parts();
    let proxy_request = self.init_request(&http_request);

    Box::pin(ProxyRouteService::exec(proxy_request, http_request, payload))
  }
}

impl ProxyRouteService {
  async fn exec(builder: RequestBuilder, http: HttpRequest, mut payload: Payload) -> Result<ServiceResponse, actix_web::Error> {
    let proxy_response = {
      let mut body_buffer = BytesMut::new();

      while let Some(chunk) = payload.next().await {
        match chunk {
          Ok(bytes) => {
            body_buffer.extend_from_slice(&bytes);
          }
          Err(err) => {
            let error_response = err.error_response();
            return Ok(ServiceResponse::new(http, error_response));
          }
        }
      }

      if body_buffer.is_empty() {
        builder.send().await
      } else {
        builder.body(body_buffer.freeze()).send().await
      }
    };

    debug!("Proxy response {:?}", &proxy_response);

    match proxy_response {
      Ok(data) => {
        let response = ProxyRouteService::map_response_head(&data);

        match data.bytes().await {
          Ok(bytes) => {
            Ok(ServiceResponse::new(http, response.set_body(BoxBody::new(bytes))))
          }
          Err(err) => {
            error!("Reading proxy body failed {}", err);
            let response = HttpResponse::InternalServerError().finish();
            Ok(ServiceResponse::new(http, response))
          }
        }
      }
      Err(err) => {
        error!("Proxy request to {} failed {}", http.path(), err);
        let response = HttpResponse::InternalServerError().finish();
        Ok(ServiceResponse::new(http, response))
      }
    }
  }

  fn init_request(&self, source_request: &HttpRequest) -> RequestBuilder {
    let path_and_query = source_request
      .uri()
      .path_and_query()
      .map(|value| value.as_str())
      .unwrap_or_else(|| source_request.path());

    let url = self.rule.forward_url(path_and_query);
    debug!("Forwarding {} {} to {}", source_request.method(), path_and_query, &url);

    let mut header_map = HeaderMap::new();

    for (name, value) in source_request.headers().iter() {
      if !is_hop_by_hop(name) && !is_recomputed(name) {
        header_map.append(name.clone(), value.clone());
      }
    }

    let host = match &self.rule.host_header {
      Some(target_host) => Some(target_host.clone()),
      None => source_request.headers().get(HOST).cloned(),
    };

    if let Some(host) = host {
      header_map.insert(HOST, host);
    }

    self.http_client
      .request(source_request.method().clone(), url)
      .headers(header_map)
  }

  fn map_response_head(response: &Response) -> HttpResponse {
    let mut http_response = HttpResponse::new(response.status());
    let headers = http_response.headers_mut();

    for (name, value) in response.headers() {
      if !is_hop_by_hop(name) && !is_recomputed(name) {
        headers.append(name.clone(), value.clone());
      }
    }

    http_response
  }
}
