use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize)]
/// Request payload for the template fetch endpoint.
/// Contains the page URL to scrape and an optional display name.
pub struct FetchTemplateRequest {
    pub url: String,
    pub name: Option<String>,
}

/// Optional metadata part accompanying an HTML file upload.
#[derive(Debug, Default, Deserialize)]
pub struct UploadMeta {
    pub name: Option<String>,
    pub base_url: Option<String>,
}

/// Full replacement of a template's slot-data overlay.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveContentRequest {
    pub data: HashMap<String, String>,
}

/// Raw AI collaborator output to be repaired and merged into the overlay.
#[derive(Debug, Deserialize)]
pub struct ImportContentRequest {
    pub response: String,
}
