use crate::store::Store;
use crate::templating::merger::{merge_html, split_slot_data, wrap_page};
use actix_web::{web, HttpResponse, Responder};

/// Actix web handler for `GET /api/export/{template_id}/preview`.
///
/// Merges the template with its current overlay and returns the complete
/// page. Slots without saved content fall back to their original text, so a
/// half-filled template still previews as a coherent page.
pub async fn process(template_id: web::Path<String>, store: web::Data<Store>) -> impl Responder {
    let template = match store.get_template(&template_id) {
        Ok(Some(template)) => template,
        Ok(None) => return HttpResponse::NotFound().body("Template not found"),
        Err(e) => {
            return HttpResponse::ServiceUnavailable()
                .body(format!("Error retrieving template: {}", e))
        }
    };
    let slot_data = match store.get_slot_data(&template_id) {
        Ok(data) => data,
        Err(e) => {
            return HttpResponse::ServiceUnavailable()
                .body(format!("Error retrieving slot data: {}", e))
        }
    };

    let (text_data, image_data) = split_slot_data(&template, &slot_data);
    let body = merge_html(&template, &text_data, &image_data);
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(wrap_page(&template, &body))
}
