use crate::model::slot::TemplateSlot;
use serde::{Deserialize, Serialize};

/// A template artifact: the slot-tagged main-region markup plus its ordered
/// slot descriptors. Created once at upload/fetch time and immutable
/// afterwards; content edits flow through the slot-data overlay instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub id: String,
    pub name: String,
    pub html_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_content: Option<String>,
    pub content_md5: String,
    pub created_at: String,
    pub slots: Vec<TemplateSlot>,
}

/// Listing row for the template index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub id: String,
    pub name: String,
    pub slot_count: usize,
    pub created_at: String,
}

/// One file of an exported static site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticFile {
    pub path: String,
    pub contents: String,
}
