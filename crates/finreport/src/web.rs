//! Password-gated report delivery endpoint.
//!
//! A minimal HTML front: `GET /` serves the login form, `POST /login`
//! checks the supplied password against the configured salted digest and on
//! success lists published artifacts, `GET /artifacts/:name` streams one
//! artifact out of the object store. A wrong password gets a 401 with a
//! constant message regardless of which check failed.

use axum::{
    extract::{Form, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use finreport_common::GateConfig;
use finreport_config::Config;
use finreport_publish::ObjectStore;
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const REJECTION_MESSAGE: &str = "Incorrect password.";

/// Shared state for the delivery endpoint.
#[derive(Clone)]
pub struct WebState {
    /// Store the published artifacts live in.
    pub store: Arc<dyn ObjectStore>,
    /// Password gate credentials.
    pub gate: GateConfig,
    /// Key prefix the publisher uploaded under.
    pub prefix: String,
}

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Plaintext password as typed by the visitor.
    pub password: String,
}

/// Builds the delivery router.
pub fn create_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(login_page))
        .route("/login", post(login))
        .route("/artifacts/:name", get(fetch_artifact))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Binds and serves the delivery endpoint until the process exits.
pub async fn serve(config: &Config, store: Arc<dyn ObjectStore>) -> anyhow::Result<()> {
    let state = WebState {
        store,
        gate: GateConfig {
            salt: config.web.password_salt.clone(),
            digest: config.web.password_digest.clone(),
        },
        prefix: config.storage.prefix.clone(),
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.web.bind_address).await?;
    info!("delivery endpoint listening on {}", config.web.bind_address);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn login_page() -> Html<&'static str> {
    Html(
        "<!doctype html>\
         <html><head><title>Report Access</title></head><body>\
         <h1>Report Access</h1>\
         <form method=\"post\" action=\"/login\">\
         <label>Password: <input type=\"password\" name=\"password\"></label>\
         <button type=\"submit\">View reports</button>\
         </form></body></html>",
    )
}

async fn login(
    State(state): State<WebState>,
    Form(form): Form<LoginForm>,
) -> Result<Html<String>, Response> {
    if !state.gate.verify(&form.password) {
        warn!("rejected login attempt");
        return Err((StatusCode::UNAUTHORIZED, REJECTION_MESSAGE).into_response());
    }

    let keys = state
        .store
        .list_objects(&state.prefix)
        .await
        .map_err(|e| {
            warn!("artifact listing failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Artifact store unavailable.").into_response()
        })?;

    let mut body = String::from(
        "<!doctype html><html><head><title>Published Reports</title></head><body>\
         <h1>Published Reports</h1><ul>",
    );
    if keys.is_empty() {
        body.push_str("<li>No reports published yet.</li>");
    }
    for key in keys {
        let name = key.rsplit('/').next().unwrap_or(&key);
        body.push_str(&format!(
            "<li><a href=\"/artifacts/{name}\">{name}</a></li>"
        ));
    }
    body.push_str("</ul></body></html>");
    Ok(Html(body))
}

async fn fetch_artifact(
    State(state): State<WebState>,
    Path(name): Path<String>,
) -> Result<Response, StatusCode> {
    if name.contains('/') || name.contains("..") {
        return Err(StatusCode::NOT_FOUND);
    }
    let key = if state.prefix.is_empty() {
        name.clone()
    } else {
        format!("{}/{name}", state.prefix.trim_end_matches('/'))
    };
    let body = state.store.get_object(&key).await.map_err(|e| {
        warn!("artifact fetch failed for {key}: {e}");
        StatusCode::NOT_FOUND
    })?;
    Ok(([(header::CONTENT_TYPE, content_type(&name))], body).into_response())
}

/// Content type by file extension; unknown extensions download as bytes.
fn content_type(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("pdf") => "application/pdf",
        Some("csv") => "text/csv",
        Some("png") => "image/png",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
