//! JSON-over-HTTP front end for [`StyleStore`].
//!
//! | method | path                       |                                   |
//! |--------|----------------------------|-----------------------------------|
//! | POST   | `/api/save-css`            | `{selector, property, value}`     |
//! | GET    | `/api/get-css`             | `{success, css}`                  |
//! | DELETE | `/api/clear-css`           | header only                       |
//! | DELETE | `/api/delete-css/:selector`| selector is percent-encoded       |
//!
//! CORS is wide open; preflight requests get an empty 204.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::error::{ServerError, StoreError};
use crate::store::{MatchMode, StyleStore, DEFAULT_STYLES_PATH};

const DELETE_PREFIX: &str = "/api/delete-css/";

type HttpResponse = Response<Full<Bytes>>;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub styles_path: PathBuf,
    pub match_mode: MatchMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            styles_path: PathBuf::from(DEFAULT_STYLES_PATH),
            match_mode: MatchMode::Exact,
        }
    }
}

/// Binds `config.addr` and serves until the listener fails.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;
    log::info!("Style server running on http://{}", config.addr);
    log::info!("Saving styles to: {}", config.styles_path.display());
    serve_on(listener, StyleStore::new(config.styles_path, config.match_mode)).await
}

/// Serves on an already bound listener, one task per connection.
pub async fn serve_on(listener: TcpListener, store: StyleStore) -> Result<(), ServerError> {
    let store = Arc::new(store);
    loop {
        let (stream, peer) = listener.accept().await.map_err(ServerError::Accept)?;
        let io = TokioIo::new(stream);
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let store = Arc::clone(&store);
                async move { Ok::<_, Infallible>(route(req, store).await) }
            });
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                log::debug!("connection from {} closed with error: {}", peer, e);
            }
        });
    }
}

async fn route(req: Request<Incoming>, store: Arc<StyleStore>) -> HttpResponse {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    log::debug!("{} {}", method, path);

    match (&method, path.as_str()) {
        (&Method::OPTIONS, _) => respond(StatusCode::NO_CONTENT, Bytes::new()),
        (&Method::POST, "/api/save-css") => save_css(req, store).await,
        (&Method::GET, "/api/get-css") => get_css(store).await,
        (&Method::DELETE, "/api/clear-css") => clear_css(store).await,
        (&Method::DELETE, p)
            if p.starts_with(DELETE_PREFIX) && p.len() > DELETE_PREFIX.len() =>
        {
            delete_css(&p[DELETE_PREFIX.len()..], store).await
        }
        _ => error(StatusCode::NOT_FOUND, "Not found"),
    }
}

#[derive(Debug, Deserialize)]
struct SaveRequest {
    selector: Option<String>,
    property: Option<String>,
    value: Option<Value>,
}

impl SaveRequest {
    /// `(selector, property, value)` when all three are usable. Numbers and
    /// booleans are accepted as values and written as text.
    fn fields(self) -> Option<(String, String, String)> {
        let selector = self.selector.filter(|s| !s.is_empty())?;
        let property = self.property.filter(|p| !p.is_empty())?;
        let value = match self.value? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        Some((selector, property, value))
    }
}

async fn save_css(req: Request<Incoming>, store: Arc<StyleStore>) -> HttpResponse {
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            log::debug!("failed to read request body: {}", e);
            return error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };
    let request: SaveRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            log::debug!("rejecting malformed JSON: {}", e);
            return error(StatusCode::BAD_REQUEST, "Invalid JSON");
        }
    };
    let Some((selector, property, value)) = request.fields() else {
        return error(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    match blocking(store, move |s| s.upsert(&selector, &property, &value)).await {
        Ok(()) => success(json!({"success": true, "message": "CSS saved successfully"})),
        Err(e) => {
            log::error!("Error saving CSS: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save CSS")
        }
    }
}

async fn get_css(store: Arc<StyleStore>) -> HttpResponse {
    match blocking(store, |s| s.get_all()).await {
        Ok(css) => success(json!({"success": true, "css": css})),
        Err(e) => {
            log::error!("Error reading CSS: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read CSS")
        }
    }
}

async fn clear_css(store: Arc<StyleStore>) -> HttpResponse {
    match blocking(store, |s| s.clear_all()).await {
        Ok(()) => success(json!({"success": true, "message": "CSS cleared"})),
        Err(e) => {
            log::error!("Error clearing CSS: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear CSS")
        }
    }
}

async fn delete_css(raw_selector: &str, store: Arc<StyleStore>) -> HttpResponse {
    let selector = match percent_decode_str(raw_selector).decode_utf8() {
        Ok(selector) => selector.into_owned(),
        Err(_) => return error(StatusCode::BAD_REQUEST, "Invalid selector"),
    };
    match blocking(store, move |s| s.delete(&selector)).await {
        Ok(()) => success(json!({"success": true, "message": "Selector deleted"})),
        Err(e) => {
            log::error!("Error deleting CSS: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete CSS")
        }
    }
}

/// Runs a store operation off the async workers. A panicked task reports as
/// an I/O error.
async fn blocking<T, F>(store: Arc<StyleStore>, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&StyleStore) -> Result<T, StoreError> + Send + 'static,
{
    let path = store.path().to_path_buf();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .unwrap_or_else(|join_error| {
            Err(StoreError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::Other, join_error.to_string()),
            ))
        })
}

fn success(body: Value) -> HttpResponse {
    json_response(StatusCode::OK, &body)
}

fn error(status: StatusCode, message: &str) -> HttpResponse {
    json_response(status, &json!({ "error": message }))
}

fn json_response(status: StatusCode, body: &Value) -> HttpResponse {
    let mut response = respond(status, Bytes::from(body.to_string()));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn respond(status: StatusCode, body: Bytes) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(json: &str) -> Option<(String, String, String)> {
        serde_json::from_str::<SaveRequest>(json).expect("json").fields()
    }

    #[test]
    fn test_save_request_validation() {
        assert_eq!(
            request(r#"{"selector": ".a", "property": "fontSize", "value": ""}"#),
            Some((".a".into(), "fontSize".into(), "".into()))
        );
        assert_eq!(
            request(r#"{"selector": ".a", "property": "opacity", "value": 0.5}"#),
            Some((".a".into(), "opacity".into(), "0.5".into()))
        );
        assert_eq!(request(r#"{"selector": "", "property": "x", "value": "1"}"#), None);
        assert_eq!(request(r#"{"selector": ".a", "value": "1"}"#), None);
        assert_eq!(request(r#"{"selector": ".a", "property": "x", "value": null}"#), None);
    }
}
