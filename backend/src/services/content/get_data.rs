use crate::store::Store;
use actix_web::{web, Responder};

/// Actix web handler for `GET /api/content/{template_id}`.
/// Returns the slot-data overlay; an empty object when none was saved.
pub async fn process(template_id: web::Path<String>, store: web::Data<Store>) -> impl Responder {
    match store.get_slot_data(&template_id) {
        Ok(data) => actix_web::HttpResponse::Ok().json(data),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error retrieving slot data: {}", e)),
    }
}
