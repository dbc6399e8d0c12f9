use crate::store::Store;
use actix_web::{web, Responder};

/// Actix web handler for the `GET /api/templates` endpoint.
/// Returns the stored templates as lightweight metadata rows.
pub async fn process(store: web::Data<Store>) -> impl Responder {
    match store.list_templates() {
        Ok(templates) => actix_web::HttpResponse::Ok().json(templates),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error listing templates: {}", e)),
    }
}
