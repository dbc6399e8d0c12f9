use crate::model::slot::SlotType;
use serde::{Deserialize, Serialize};

/// AI-facing description of a text slot: what to write and how much of it.
/// Image and CTA slots never become fields; they are filled by other means.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub slot_id: String,
    pub label: String,
    pub slot_type: SlotType,
    pub description: String,
    pub max_length: u32,
    pub tag_name: String,
    pub original_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
}
