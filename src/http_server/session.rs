//! # Session Middleware
//!
//! Every request runs in a tab session. A valid `x-session-id` header selects
//! an existing session; otherwise a new id is issued. Either way the id is
//! stored in request extensions for handlers and echoed in the response header.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// Header carrying the caller's session id
pub const SESSION_HEADER: &str = "x-session-id";

/// Session id wrapper for extension storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Session id sent by the client, if it is a valid UUID
pub fn session_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
}

/// Resolve or issue the request's session id
pub async fn assign_session(mut request: Request, next: Next) -> Response {
    let session = match session_from_headers(request.headers()) {
        Some(session) => session,
        None => {
            let session = Uuid::new_v4();
            tracing::debug!(event = "SESSION_ISSUED", %session);
            session
        }
    };

    request.extensions_mut().insert(SessionId(session));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&session.to_string()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }

    response
}
