use crate::config::Config;
use crate::store::Store;
use crate::templating::merger::build_static_files;
use actix_web::{web, HttpResponse, Responder};
use common::model::template::StaticFile;
use log::info;
use std::fs;
use std::path::Path;

pub async fn process(
    template_id: web::Path<String>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    match build_site(&store, &config, &template_id).await {
        Ok(files) => HttpResponse::Ok().json(files),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("Error building site: {}", e)),
    }
}

/// Builds the static file pair for a template and writes it under
/// `{export_dir}/{template_id}/`. Returns the files so the caller can also
/// offer them as a direct download.
pub async fn build_site(
    store: &Store,
    config: &Config,
    template_id: &str,
) -> Result<Vec<StaticFile>, String> {
    let template = store
        .get_template(template_id)?
        .ok_or("Template not found")?;
    let slot_data = store.get_slot_data(template_id)?;

    let files = build_static_files(&template, &slot_data);

    let site_dir = Path::new(&config.export_dir).join(template_id);
    fs::create_dir_all(&site_dir).map_err(|e| e.to_string())?;
    for file in &files {
        fs::write(site_dir.join(&file.path), &file.contents).map_err(|e| e.to_string())?;
    }
    info!(
        "Exported template {} to {}",
        template_id,
        site_dir.display()
    );

    Ok(files)
}
