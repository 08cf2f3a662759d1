use std::net::SocketAddr;
use std::time::Duration;

use actix_web::http::header::{HOST, LOCATION};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

/// Starts a backend on an ephemeral port that echoes what it received.
/// `/missing`, `/redirect` and `/slow` paths answer 404, 302 and after 2s.
pub async fn spawn_backend() -> SocketAddr {
  let server = HttpServer::new(|| App::new().default_service(web::to(echo)))
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

  let addr = server.addrs()[0];
  actix_web::rt::spawn(server.run());
  addr
}

async fn echo(req: HttpRequest, body: web::Bytes) -> HttpResponse {
  if req.path().ends_with("/slow") {
    actix_web::rt::time::sleep(Duration::from_secs(2)).await;
    return HttpResponse::Ok().body("late");
  }

  if req.path().ends_with("/missing") {
    return HttpResponse::NotFound().body("missing");
  }

  if req.path().ends_with("/redirect") {
    return HttpResponse::Found()
      .insert_header((LOCATION, "/elsewhere"))
      .finish();
  }

  let host = req
    .headers()
    .get(HOST)
    .and_then(|value| value.to_str().ok())
    .unwrap_or_default();

  HttpResponse::Ok()
    .insert_header(("x-upstream", "echo"))
    .body(format!(
      "{} {} host={} body={}",
      req.method(),
      req.uri(),
      host,
      String::from_utf8_lossy(&body)
    ))
}
