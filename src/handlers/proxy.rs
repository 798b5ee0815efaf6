use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    response::Response,
};

use crate::error::ApiError;
use crate::handlers::ProxyState;
use crate::transport::{ScopedRequest, ScopedResponse};

/// Connection-level headers that must not be forwarded in either direction
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Catch-all: forward the console's call upstream through the pipeline
pub async fn forward(State(state): State<ProxyState>, request: Request) -> Result<Response, ApiError> {
    let scoped = into_scoped(request, state.max_request_size_bytes).await?;
    let response = state.client.send(scoped).await?;
    Ok(into_response(response))
}

pub async fn into_scoped(request: Request, limit: usize) -> Result<ScopedRequest, ApiError> {
    let (parts, body) = request.into_parts();

    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ApiError::payload_too_large(format!("Request body exceeds {} bytes", limit)))?;

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    // Let the transport negotiate compression so bodies arrive decoded
    headers.remove(header::ACCEPT_ENCODING);

    Ok(ScopedRequest {
        method: parts.method,
        target,
        headers,
        body,
    })
}

pub fn into_response(scoped: ScopedResponse) -> Response {
    let mut headers = scoped.headers;
    strip_hop_by_hop(&mut headers);
    headers.remove(header::CONTENT_LENGTH);

    let mut response = Response::new(Body::from(scoped.body));
    *response.status_mut() = scoped.status;
    *response.headers_mut() = headers;
    response
}
