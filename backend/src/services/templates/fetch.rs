//! # Template Fetch Service
//!
//! Provides the `POST /api/templates/fetch` endpoint: fetches a live page
//! server-side and feeds it through the same ingestion pipeline as a file
//! upload, with the page URL as the base for relative-link resolution.
//! Fetching server-side keeps arbitrary third-party pages reachable without
//! the browser's cross-origin restrictions.

use crate::services::templates::upload::ingest_html;
use crate::store::Store;
use actix_web::{web, HttpResponse, Responder};
use common::requests::FetchTemplateRequest;
use url::Url;

/// Matching what the target sites serve to real visitors.
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

enum FetchError {
    Invalid(String),
    Upstream(String),
}

pub async fn process(
    store: web::Data<Store>,
    payload: web::Json<FetchTemplateRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    match fetch_template(&store, &request).await {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(FetchError::Invalid(msg)) => HttpResponse::BadRequest().body(msg),
        Err(FetchError::Upstream(msg)) => HttpResponse::BadGateway().body(msg),
    }
}

async fn fetch_template(
    store: &Store,
    request: &FetchTemplateRequest,
) -> Result<common::model::template::TemplateConfig, FetchError> {
    let parsed = Url::parse(request.url.trim())
        .map_err(|_| FetchError::Invalid("Invalid URL".to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::Invalid(
            "Only http and https URLs are allowed".to_string(),
        ));
    }

    let response = reqwest::Client::new()
        .get(parsed.clone())
        .header(reqwest::header::USER_AGENT, BROWSER_UA)
        .send()
        .await
        .map_err(|e| FetchError::Upstream(format!("Failed to fetch the page: {}", e)))?;

    if !response.status().is_success() {
        return Err(FetchError::Upstream(format!(
            "Failed to fetch: {}",
            response.status()
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| FetchError::Upstream(e.to_string()))?;

    let name = request
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| "Fetched page".to_string());

    ingest_html(store, &html, Some(parsed.as_str()), &name).map_err(FetchError::Upstream)
}
