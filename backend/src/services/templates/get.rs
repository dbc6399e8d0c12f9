use crate::store::Store;
use actix_web::{web, Responder};

/// Actix web handler for the `GET /api/templates/{template_id}` endpoint.
///
/// # Returns
/// - `200 OK` with the `TemplateConfig` as a JSON payload on success.
/// - `404 Not Found` when no template has that ID.
/// - `503 Service Unavailable` when the store cannot be read.
pub async fn process(template_id: web::Path<String>, store: web::Data<Store>) -> impl Responder {
    match store.get_template(&template_id) {
        Ok(Some(template)) => actix_web::HttpResponse::Ok().json(template),
        Ok(None) => actix_web::HttpResponse::NotFound().body("Template not found"),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error retrieving template: {}", e)),
    }
}
