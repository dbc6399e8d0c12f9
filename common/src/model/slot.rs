use serde::{Deserialize, Serialize};

/// Semantic role of a detected slot. The role is a hint for content
/// generation; the structural contract is the slot's `tag_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Headline,
    Subheadline,
    Paragraph,
    List,
    Image,
    Cta,
}

impl SlotType {
    pub fn is_text(&self) -> bool {
        !matches!(self, SlotType::Image)
    }
}

/// One editable region detected inside a template.
///
/// The `data-slot` attribute carrying `id` on the corresponding element in
/// the template body is the only link between this descriptor and its
/// physical location. `original_content` stays frozen after detection;
/// edits live in the slot-data overlay, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSlot {
    pub id: String,
    #[serde(rename = "type")]
    pub slot_type: SlotType,
    pub label: String,
    pub tag_name: String,
    pub original_content: String,
    /// Raw original attributes (e.g. `class="hero" style="..."`), minus the
    /// slot marker and, for images, src/width/height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// List-item decoration pattern with a `{{CONTENT}}` placeholder,
    /// captured from the first original `<li>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_template: Option<String>,
}
