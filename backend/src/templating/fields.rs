//! Derives the AI-facing field definitions for a template.
//!
//! Image and CTA slots are never text-generation targets and are filtered
//! out. The remaining slots get a final character budget and a corrected
//! type: short original text is forced to `headline` whatever the detector
//! said, because a 20-character `<p>` treated as a paragraph invites the
//! generator to write layout-breaking walls of text into a label.

use common::model::field::FieldDefinition;
use common::model::slot::{SlotType, TemplateSlot};
use common::model::template::TemplateConfig;

/// Original-content length below which a slot is always treated as a
/// headline by the generation step.
const HEADLINE_FORCE_LEN: u32 = 120;

/// Field definitions for every text slot of the template, in slot order.
pub fn template_fields(template: &TemplateConfig) -> Vec<FieldDefinition> {
    template
        .slots
        .iter()
        .filter(|slot| !matches!(slot.slot_type, SlotType::Image | SlotType::Cta))
        .map(slot_to_field)
        .collect()
}

fn slot_to_field(slot: &TemplateSlot) -> FieldDefinition {
    let mut slot_type = map_slot_type(slot.slot_type);
    let content_len = slot.original_content.chars().count() as u32;

    let mut max_length = slot
        .max_length
        .or_else(|| smart_max_length(slot, content_len))
        .unwrap_or(match slot_type {
            SlotType::Headline => 60,
            SlotType::List => 800,
            _ => 500,
        });

    if content_len > 0 && content_len < HEADLINE_FORCE_LEN {
        slot_type = SlotType::Headline;
        max_length = (content_len + 15).min(HEADLINE_FORCE_LEN);
    } else if max_length < HEADLINE_FORCE_LEN {
        slot_type = SlotType::Headline;
    }

    FieldDefinition {
        slot_id: slot.id.clone(),
        label: slot.label.clone(),
        slot_type,
        description: format!("Content slot: {}", slot.label),
        max_length,
        tag_name: slot.tag_name.clone(),
        original_content: slot.original_content.clone(),
        word_count: slot.word_count,
    }
}

fn map_slot_type(slot_type: SlotType) -> SlotType {
    match slot_type {
        SlotType::Headline => SlotType::Headline,
        SlotType::Subheadline => SlotType::Subheadline,
        SlotType::List => SlotType::List,
        SlotType::Cta => SlotType::Headline,
        SlotType::Paragraph | SlotType::Image => SlotType::Paragraph,
    }
}

/// Headings size to their original text; other tags defer to the per-type
/// defaults.
fn smart_max_length(slot: &TemplateSlot, content_len: u32) -> Option<u32> {
    match slot.tag_name.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(content_len + 15),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: &str, slot_type: SlotType, tag: &str, content: &str) -> TemplateSlot {
        TemplateSlot {
            id: id.to_string(),
            slot_type,
            label: id.to_string(),
            tag_name: tag.to_string(),
            original_content: content.to_string(),
            attributes: None,
            max_length: None,
            word_count: None,
            width: None,
            height: None,
            list_template: None,
        }
    }

    fn template_with(slots: Vec<TemplateSlot>) -> TemplateConfig {
        TemplateConfig {
            id: "t".to_string(),
            name: "t".to_string(),
            html_body: String::new(),
            css: None,
            head_content: None,
            content_md5: String::new(),
            created_at: String::new(),
            slots,
        }
    }

    #[test]
    fn image_and_cta_slots_are_excluded() {
        let template = template_with(vec![
            slot("pic", SlotType::Image, "img", "/x.png"),
            slot("buy", SlotType::Cta, "a", "Buy now"),
            slot("head", SlotType::Headline, "h1", "A headline"),
        ]);
        let fields = template_fields(&template);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].slot_id, "head");
    }

    #[test]
    fn short_text_is_forced_to_headline() {
        let template = template_with(vec![slot(
            "label",
            SlotType::Paragraph,
            "p",
            "Information About NMN",
        )]);
        let fields = template_fields(&template);
        assert_eq!(fields[0].slot_type, SlotType::Headline);
        assert_eq!(fields[0].max_length, 21 + 15);
    }

    #[test]
    fn long_paragraph_stays_paragraph_with_default_budget() {
        let long = "x".repeat(200);
        let template = template_with(vec![slot("body", SlotType::Paragraph, "p", &long)]);
        let fields = template_fields(&template);
        assert_eq!(fields[0].slot_type, SlotType::Paragraph);
        assert_eq!(fields[0].max_length, 500);
    }

    #[test]
    fn forced_headline_budget_caps_at_120() {
        let content = "y".repeat(115);
        let template = template_with(vec![slot("label", SlotType::Paragraph, "p", &content)]);
        let fields = template_fields(&template);
        assert_eq!(fields[0].slot_type, SlotType::Headline);
        assert_eq!(fields[0].max_length, 120);
    }

    #[test]
    fn heading_tags_derive_budget_from_original_length() {
        let content = "z".repeat(130);
        let template = template_with(vec![slot("big", SlotType::Headline, "h2", &content)]);
        let fields = template_fields(&template);
        assert_eq!(fields[0].max_length, 130 + 15);
        assert_eq!(fields[0].slot_type, SlotType::Headline);
    }

    #[test]
    fn detector_budget_wins_when_present() {
        let mut s = slot("listy", SlotType::List, "ul", &"item\n".repeat(40));
        s.max_length = Some(240);
        let template = template_with(vec![s]);
        let fields = template_fields(&template);
        assert_eq!(fields[0].max_length, 240);
        assert_eq!(fields[0].slot_type, SlotType::List);
    }
}
