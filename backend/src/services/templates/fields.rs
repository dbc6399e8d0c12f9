use crate::store::Store;
use crate::templating::fields::template_fields;
use actix_web::{web, Responder};

/// Actix web handler for the `GET /api/templates/{template_id}/fields`
/// endpoint. Returns the AI-facing field definitions for the template's
/// text slots.
pub async fn process(template_id: web::Path<String>, store: web::Data<Store>) -> impl Responder {
    match store.get_template(&template_id) {
        Ok(Some(template)) => actix_web::HttpResponse::Ok().json(template_fields(&template)),
        Ok(None) => actix_web::HttpResponse::NotFound().body("Template not found"),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable()
            .body(format!("Error retrieving template: {}", e)),
    }
}
