use crate::store::Store;
use crate::templating::json_repair::parse_slot_content;
use actix_web::{web, HttpResponse, Responder};
use common::requests::ImportContentRequest;
use log::warn;
use std::collections::HashMap;

pub async fn process(
    template_id: web::Path<String>,
    store: web::Data<Store>,
    payload: web::Json<ImportContentRequest>,
) -> impl Responder {
    match import_content(&store, &template_id, &payload.response).await {
        Ok(merged) => HttpResponse::Ok().json(merged),
        Err(e) => HttpResponse::BadRequest().body(format!("Error importing content: {}", e)),
    }
}

/// Repairs and parses a raw AI response, then merges the recognized slot
/// values into the stored overlay. Imported values win over existing ones;
/// slots the response doesn't mention keep their current content.
pub async fn import_content(
    store: &Store,
    template_id: &str,
    response: &str,
) -> Result<HashMap<String, String>, String> {
    let template = store
        .get_template(template_id)?
        .ok_or("Template not found")?;

    let parsed = parse_slot_content(response, &template.slots)?;
    if parsed.is_empty() {
        warn!(
            "AI response for template {} parsed but matched no known slot ids",
            template_id
        );
    }

    let mut merged = store.get_slot_data(template_id)?;
    merged.extend(parsed);
    store.save_slot_data(template_id, &merged)?;
    Ok(merged)
}
