use crate::store::Store;
use crate::templating::slot_detector::detect_slots;
use crate::templating::url_resolver::{
    extract_body_html, extract_css, extract_head_content, resolve_urls_in_html,
};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::model::template::TemplateConfig;
use common::requests::UploadMeta;
use futures_util::StreamExt;
use log::info;
use serde_json::from_slice;
use uuid::Uuid;

/// HTTP handler wrapper that converts the internal result to an `HttpResponse`.
///
/// - On success: returns `200 OK` with the stored `TemplateConfig` as JSON.
/// - On failure: returns `400 Bad Request` with the error message.
pub async fn process(store: web::Data<Store>, payload: Multipart) -> impl Responder {
    match upload_template(&store, payload).await {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

/// Reads an uploaded HTML document plus its optional `json` metadata part
/// and turns it into a stored template.
pub async fn upload_template(
    store: &Store,
    mut payload: Multipart,
) -> Result<TemplateConfig, Box<dyn std::error::Error>> {
    let mut meta = UploadMeta::default();
    let mut html_bytes: Vec<u8> = Vec::new();
    let mut filename: Option<String> = None;
    let mut file_seen = false;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("file") => {
                filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()));
                if let Some(ref name) = filename {
                    let lower = name.to_lowercase();
                    if !lower.ends_with(".html") && !lower.ends_with(".htm") {
                        return Err("The file must end with .html or .htm".into());
                    }
                }
                while let Some(chunk) = field.next().await {
                    html_bytes.extend_from_slice(&chunk?);
                }
                file_seen = true;
            }
            Some("json") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk?);
                }
                meta = from_slice(&bytes)?;
            }
            _ => {}
        }
    }

    if !file_seen || html_bytes.is_empty() {
        return Err("Missing file".into());
    }

    let html = String::from_utf8_lossy(&html_bytes).into_owned();
    let name = meta
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| {
            filename.as_deref().map(|f| {
                f.trim_end_matches(".html")
                    .trim_end_matches(".htm")
                    .to_string()
            })
        })
        .unwrap_or_else(|| "Uploaded page".to_string());

    ingest_html(store, &html, meta.base_url.as_deref(), &name).map_err(Into::into)
}

/// The shared ingestion pipeline behind upload and fetch:
/// md5 dedup, URL resolution, head/body split, slot detection, persist.
pub(crate) fn ingest_html(
    store: &Store,
    html: &str,
    base_url: Option<&str>,
    name: &str,
) -> Result<TemplateConfig, String> {
    let content_md5 = format!("{:x}", md5::compute(html.as_bytes()));
    if let Some(existing) = store.find_by_md5(&content_md5)? {
        info!(
            "Source markup already ingested as template {}; returning it",
            existing.id
        );
        return Ok(existing);
    }

    let resolved = resolve_urls_in_html(html, base_url);
    let head_content = extract_head_content(&resolved);
    let css = extract_css(&resolved);
    let body = extract_body_html(&resolved);
    let detected = detect_slots(&body);

    let config = TemplateConfig {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        html_body: detected.html_body,
        css: Some(css).filter(|c| !c.is_empty()),
        head_content: Some(head_content).filter(|h| !h.is_empty()),
        content_md5,
        created_at: chrono::Utc::now().to_rfc3339(),
        slots: detected.slots,
    };

    store.save_template(&config)?;
    info!(
        "Created template {} ({} slots) from {}",
        config.id,
        config.slots.len(),
        name
    );
    Ok(config)
}
