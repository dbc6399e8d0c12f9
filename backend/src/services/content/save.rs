use crate::store::Store;
use actix_web::{web, HttpResponse, Responder};
use common::requests::SaveContentRequest;

pub async fn process(
    template_id: web::Path<String>,
    store: web::Data<Store>,
    payload: web::Json<SaveContentRequest>,
) -> impl Responder {
    match save_slot_data(&store, &template_id, payload.into_inner()).await {
        Ok(_) => HttpResponse::Ok().body("Slot data saved"),
        Err(e) => HttpResponse::BadRequest().body(format!("Error saving slot data: {}", e)),
    }
}

/// Replaces a template's overlay after checking every key against the
/// template's slot list.
pub async fn save_slot_data(
    store: &Store,
    template_id: &str,
    request: SaveContentRequest,
) -> Result<(), String> {
    let template = store
        .get_template(template_id)?
        .ok_or("Template not found")?;

    let unknown: Vec<&str> = request
        .data
        .keys()
        .filter(|key| !template.slots.iter().any(|s| &s.id == *key))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(format!(
            "Unknown slot ids for this template: {}",
            unknown.join(", ")
        ));
    }

    store.save_slot_data(template_id, &request.data)
}
