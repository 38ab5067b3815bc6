use crate::brevo::BrevoClient;
use crate::config::Config;
use crate::handler::{ContactService, SubmissionError};
use crate::sitemap;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Largest accepted contact form body; a real submission is a few KB
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub contact: ContactService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let brevo = BrevoClient::new(&config).context("Failed to build Brevo HTTP client")?;

        Ok(Self {
            contact: ContactService::new(Arc::clone(&config), brevo),
            config,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteConfig {
    contact_email: String,
    calendar_link: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/send",
            post(send_contact).layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .route("/api/site-config", get(site_config))
        .route("/sitemap.xml", get(sitemap_xml))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn send_contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match body {
        Ok(body) => state.contact.handle_submission(&body).await,
        // Oversized or unreadable bodies still get the JSON error shape
        Err(rejection) => SubmissionError::Unexpected(
            anyhow::anyhow!(rejection.body_text()).context("Failed to read request body"),
        )
        .into_response(),
    }
}

async fn site_config(State(state): State<AppState>) -> Json<SiteConfig> {
    Json(SiteConfig {
        contact_email: state.config.contact_email.clone(),
        calendar_link: state.config.calendar_link.clone(),
    })
}

async fn sitemap_xml(State(state): State<AppState>) -> Response {
    let entries = sitemap::entries(&state.config.site_url, Utc::now());

    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap::render(&entries),
    )
        .into_response()
}
