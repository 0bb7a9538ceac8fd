use crate::otp::OtpService;
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa_swagger_ui::SwaggerUi;

pub mod error;
pub mod handlers;
mod openapi;

pub use openapi::openapi;

use handlers::auth_otp::{self, password, register};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    base_path: String,
    frontend_base_url: Option<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_path: auth_otp::BASE_PATH.to_string(),
            frontend_base_url: None,
        }
    }

    /// Mount point for the OTP routes; normalized to `/segment/...` without a trailing slash.
    #[must_use]
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    /// Allow browser calls from this origin (CORS is off when unset).
    #[must_use]
    pub fn with_frontend_base_url(mut self, url: Option<String>) -> Self {
        self.frontend_base_url = url;
        self
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> Option<&str> {
        self.frontend_base_url.as_deref()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the server
/// # Errors
/// Return error if the router cannot be built or the listener fails
pub async fn new(port: u16, config: ServerConfig, service: Arc<dyn OtpService>) -> Result<()> {
    let app = app(&config, service)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!(
        "Listening on [::]:{}, otp routes under {}",
        port,
        config.base_path()
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

/// Routes only: the OTP endpoints under `base_path`, `/health` and the docs.
#[must_use]
pub fn router(base_path: &str) -> Router {
    let otp = Router::new()
        .route("/register/start", post(register::start_register))
        .route("/register/verify", post(register::verify_register))
        .route(
            "/password/forgot/start",
            post(password::start_forgot_password),
        )
        .route(
            "/password/forgot/complete",
            post(password::complete_forgot_password),
        );

    let base_path = normalize_base_path(base_path);
    let router = Router::new().route("/health", get(handlers::health));
    let router = if base_path.is_empty() {
        router.merge(otp)
    } else {
        router.nest(&base_path, otp)
    };

    router.merge(SwaggerUi::new(openapi::DOCS_PATH).url(openapi::OPENAPI_JSON_PATH, openapi()))
}

/// Full application: routes plus request-id, tracing, CORS and the service extension.
/// # Errors
/// Return error if the frontend URL cannot be turned into a CORS origin
pub fn app(config: &ServerConfig, service: Arc<dyn OtpService>) -> Result<Router> {
    let mut app = router(config.base_path());

    if let Some(frontend) = config.frontend_base_url() {
        let cors = CorsLayer::new()
            .allow_headers([CONTENT_TYPE])
            .allow_methods([Method::GET, Method::POST])
            .allow_origin(AllowOrigin::exact(frontend_origin(frontend)?));
        app = app.layer(cors);
    }

    Ok(app.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static(REQUEST_ID_HEADER),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(Extension(service)),
    ))
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn frontend_origin(frontend_base_url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(frontend_base_url)
        .with_context(|| format!("Invalid frontend base URL: {frontend_base_url}"))?;
    let host = parsed.host_str().ok_or_else(|| {
        anyhow!("Frontend base URL must include a valid host: {frontend_base_url}")
    })?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}
