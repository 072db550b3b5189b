//! HTTP surface: request dispatch and the axum router.
//!
//! Every recognized request first refreshes the stored rates (scrape then
//! record). `GET /getexchangerates` additionally answers with the
//! day-over-day comparison; every other route answers `200` with an empty body.

use crate::compare::compare;
use crate::core::{AppError, AppResult, Clock, RateSource, RateStore};
use crate::refresh::refresh;
use axum::{
    Router,
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

pub const EXCHANGE_RATES_PATH: &str = "/getexchangerates";

const STANDARD_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
    Method::CONNECT,
    Method::PATCH,
    Method::TRACE,
];

/// Components shared by all handlers, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RateSource>,
    pub store: Arc<dyn RateStore>,
    pub clock: Arc<dyn Clock>,
    /// Scrape and record before answering each request.
    pub refresh_on_request: bool,
}

/// Method and path of an inbound request, in API-gateway event form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatewayRequest {
    #[serde(rename = "httpMethod")]
    pub http_method: Option<String>,
    pub path: Option<String>,
}

impl GatewayRequest {
    pub fn new(http_method: &str, path: &str) -> Self {
        Self {
            http_method: Some(http_method.to_string()),
            path: Some(path.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl GatewayResponse {
    fn empty() -> Self {
        Self {
            status_code: 200,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            headers: BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body,
        }
    }

    fn from_error(err: &AppError) -> Self {
        let body = match err {
            AppError::BadRequest => "Bad Request",
            _ => "Internal Server Error",
        };
        Self {
            status_code: err.status_code(),
            headers: BTreeMap::new(),
            body: body.to_string(),
        }
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

/// Handles one request end to end. Failures are turned into responses.
pub async fn dispatch(state: &AppState, request: &GatewayRequest) -> GatewayResponse {
    match handle(state, request).await {
        Ok(response) => response,
        Err(AppError::BadRequest) => {
            warn!(?request, "Rejected request without a recognizable method");
            GatewayResponse::from_error(&AppError::BadRequest)
        }
        Err(e) => {
            error!(error = %e, ?request, "Request failed");
            GatewayResponse::from_error(&e)
        }
    }
}

async fn handle(state: &AppState, request: &GatewayRequest) -> AppResult<GatewayResponse> {
    let method = request.http_method.as_deref().ok_or(AppError::BadRequest)?;
    // A missing path matches no route.
    let path = request.path.as_deref().unwrap_or_default();

    if state.refresh_on_request {
        let count = refresh(
            state.source.as_ref(),
            state.store.as_ref(),
            state.clock.as_ref(),
        )
        .await?;
        debug!(count, "Refreshed rates for request");
    }

    if method == Method::GET.as_str() && path == EXCHANGE_RATES_PATH {
        let report = compare(state.store.as_ref(), state.clock.as_ref()).await?;
        let body = serde_json::to_string(&report)
            .map_err(|e| AppError::Internal(format!("Failed to encode comparison: {e}")))?;
        return Ok(GatewayResponse::json(body));
    }

    Ok(GatewayResponse::empty())
}

/// Extension methods carry no recognizable method over HTTP.
async fn handle_http(State(state): State<AppState>, method: Method, uri: Uri) -> GatewayResponse {
    let request = GatewayRequest {
        http_method: STANDARD_METHODS
            .contains(&method)
            .then(|| method.as_str().to_string()),
        path: Some(uri.path().to_string()),
    };
    dispatch(&state, &request).await
}

/// Creates the application router. All routes go through [`dispatch`].
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(handle_http)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
