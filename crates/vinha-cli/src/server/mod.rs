pub mod apispec;
pub mod auth;
pub mod router;

use std::io::Read;

use anyhow::anyhow;
use tiny_http::{Header, Request, Response, Server};
use tracing::{info, warn};

use router::{Api, ApiRequest, ApiResponse};

/// Largest request body read; only `/login` carries one.
const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Serve `api` on `addr` until the process is stopped.
///
/// Requests are handled one at a time on the calling thread.
pub fn run(api: &Api, addr: &str) -> anyhow::Result<()> {
    let server = Server::http(addr).map_err(|e| anyhow!("binding {addr}: {e}"))?;
    info!("listening on http://{addr}");

    for mut request in server.incoming_requests() {
        let response = match read_request(&mut request) {
            Ok(api_request) => api.handle(&api_request),
            Err(e) => ApiResponse {
                status: 400,
                body: serde_json::json!({ "error": format!("unreadable request body: {e}") }),
            },
        };
        info!(
            method = %request.method(),
            url = request.url(),
            status = response.status,
            "request"
        );
        if let Err(e) = respond(request, response) {
            warn!(error = %e, "failed to send response");
        }
    }
    Ok(())
}

fn read_request(request: &mut Request) -> std::io::Result<ApiRequest> {
    let body = read_body(request.as_reader())?;
    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.as_str().to_string());
    Ok(ApiRequest {
        method: request.method().clone(),
        url: request.url().to_string(),
        authorization,
        body,
    })
}

fn read_body(reader: impl Read) -> std::io::Result<String> {
    let mut body = String::new();
    reader.take(MAX_BODY_BYTES).read_to_string(&mut body)?;
    Ok(body)
}

fn respond(request: Request, response: ApiResponse) -> std::io::Result<()> {
    let mut reply =
        Response::from_string(response.body.to_string()).with_status_code(response.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        reply = reply.with_header(header);
    }
    request.respond(reply)
}
