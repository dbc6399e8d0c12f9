//! # Slot Detection
//!
//! Turns raw page markup into a template: finds the main content region,
//! walks its headings, paragraphs, lists and images in document order, and
//! records each as a [`TemplateSlot`] while tagging the element in place
//! with a `data-slot` attribute. That attribute is the only link between a
//! descriptor and its DOM position, so detection is idempotent: an element
//! that already carries it is never extracted twice.
//!
//! Main-region selection is a heuristic behind the [`RegionScorer`] trait;
//! the default [`DensityScorer`] scores candidates by paragraph and heading
//! density with a denylist for navigational chrome. Pages with unusual
//! markup may score the wrong region, in which case the whole body is used.

use crate::templating::inner_html;
use common::model::slot::{SlotType, TemplateSlot};
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use regex::Regex;
use std::sync::OnceLock;

/// Attribute linking a slot descriptor to its element.
pub const SLOT_ATTR: &str = "data-slot";

/// Placeholder token inside a captured list-item decoration pattern.
pub const LIST_CONTENT_TOKEN: &str = "{{CONTENT}}";

/// Class/id fragments that disqualify a container from being main content.
const REGION_DENYLIST: &[&str] = &[
    "sidebar", "footer", "header", "nav", "menu", "popup", "modal", "cookie", "widget",
];

/// Class names whose descendants are never extracted as slots.
const CONTAINER_DENYLIST: &[&str] = &["sidebar", "footer", "nav", "menu", "widget"];

fn style_width_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)width:\s*(\d+)px").unwrap())
}

fn style_height_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)height:\s*(\d+)px").unwrap())
}

/// Result of a detection pass: the rewritten main-region markup (slot-tagged)
/// and the ordered slot descriptors.
#[derive(Debug, Clone)]
pub struct DetectedTemplate {
    pub html_body: String,
    pub slots: Vec<TemplateSlot>,
}

/// Strategy for picking the main content region.
///
/// Returns `None` when the candidate must not be considered at all, or a
/// score; the highest-scoring candidate wins and the document body is the
/// fallback. Kept as a trait so alternative heuristics (semantic
/// `<article>`/`<main>` preference, readability scoring) can be swapped in
/// without touching slot extraction.
pub trait RegionScorer {
    fn score(&self, candidate: &NodeDataRef<ElementData>) -> Option<i64>;
}

/// Default scorer: `paragraphs + 2 x headings`, requiring at least one
/// paragraph and no denylisted class/id token.
pub struct DensityScorer;

impl RegionScorer for DensityScorer {
    fn score(&self, candidate: &NodeDataRef<ElementData>) -> Option<i64> {
        {
            let attrs = candidate.attributes.borrow();
            let class = attrs.get("class").unwrap_or("").to_lowercase();
            let id = attrs.get("id").unwrap_or("").to_lowercase();
            if REGION_DENYLIST
                .iter()
                .any(|term| class.contains(term) || id.contains(term))
            {
                return None;
            }
        }
        let node = candidate.as_node();
        let paragraphs = node.select("p").map(|s| s.count()).unwrap_or(0);
        if paragraphs < 1 {
            return None;
        }
        let headings = node
            .select("h1, h2, h3, h4, h5, h6")
            .map(|s| s.count())
            .unwrap_or(0);
        Some(paragraphs as i64 + 2 * headings as i64)
    }
}

/// Detect slots with the default density scorer.
pub fn detect_slots(html_body: &str) -> DetectedTemplate {
    detect_slots_with_scorer(html_body, &DensityScorer)
}

/// Detect slots in `html_body`, selecting the main region with `scorer`.
///
/// Malformed or empty input degrades to an empty slot list; this function
/// never fails.
pub fn detect_slots_with_scorer(html_body: &str, scorer: &dyn RegionScorer) -> DetectedTemplate {
    if html_body.trim().is_empty() {
        return DetectedTemplate {
            html_body: String::new(),
            slots: Vec::new(),
        };
    }

    let document = kuchiki::parse_html().one(html_body.to_string());
    let body = match document.select_first("body") {
        Ok(body) => body.as_node().clone(),
        Err(()) => {
            return DetectedTemplate {
                html_body: html_body.to_string(),
                slots: Vec::new(),
            }
        }
    };

    let content_root = find_main_content(&body, scorer);
    let mut slots: Vec<TemplateSlot> = Vec::new();

    let elements: Vec<NodeDataRef<ElementData>> = content_root
        .select("h1, h2, h3, h4, h5, h6, p, ul, ol, img")
        .map(|sel| sel.collect())
        .unwrap_or_default();

    for element in elements {
        if let Some(slot) = extract_slot(&element, &slots) {
            element
                .attributes
                .borrow_mut()
                .insert(SLOT_ATTR, slot.id.clone());
            slots.push(slot);
        }
    }

    DetectedTemplate {
        html_body: inner_html(&content_root),
        slots,
    }
}

fn find_main_content(body: &NodeRef, scorer: &dyn RegionScorer) -> NodeRef {
    let mut best = body.clone();
    let mut max_score = 0i64;
    if let Ok(candidates) = body.select("div, article, section, main") {
        for candidate in candidates {
            if let Some(score) = scorer.score(&candidate) {
                if score > max_score {
                    max_score = score;
                    best = candidate.as_node().clone();
                }
            }
        }
    }
    best
}

fn extract_slot(
    element: &NodeDataRef<ElementData>,
    existing: &[TemplateSlot],
) -> Option<TemplateSlot> {
    let node = element.as_node();
    if in_denylisted_container(node) {
        return None;
    }

    let tag_name = element.name.local.to_string();
    let slot_type = match tag_name.as_str() {
        "h1" | "h2" => SlotType::Headline,
        "h3" | "h4" | "h5" | "h6" => SlotType::Subheadline,
        "p" => SlotType::Paragraph,
        "ul" | "ol" => SlotType::List,
        "img" => SlotType::Image,
        _ => return None,
    };

    if element.attributes.borrow().contains(SLOT_ATTR) {
        return None;
    }

    // Filter tiny text noise, but keep images.
    let text = node.text_contents().trim().to_string();
    if slot_type != SlotType::Image && text.chars().count() < 5 {
        return None;
    }

    let base_id = if slot_type == SlotType::Image {
        let alt = element
            .attributes
            .borrow()
            .get("alt")
            .filter(|a| !a.trim().is_empty())
            .unwrap_or("image")
            .to_string();
        slugify(&alt, 20)
    } else {
        slugify(&text, 35)
    };
    let base_id = if base_id.chars().count() < 2 {
        format!("{}_{}", type_key(slot_type), existing.len())
    } else {
        base_id
    };

    let mut slot_id = base_id.clone();
    let mut counter = 1;
    while existing.iter().any(|s| s.id == slot_id) {
        slot_id = format!("{}_{}", base_id, counter);
        counter += 1;
    }
    let label = labelize(&slot_id);

    let original_content = match slot_type {
        SlotType::List => list_item_texts(node).join("\n"),
        SlotType::Image => element
            .attributes
            .borrow()
            .get("src")
            .unwrap_or("")
            .to_string(),
        _ => text,
    };

    // Short paragraphs in scraped pages are almost always styled as
    // headlines, whatever their tag says.
    let content_len = original_content.chars().count() as u32;
    let effective_type = if slot_type == SlotType::Paragraph && content_len < 100 {
        SlotType::Headline
    } else {
        slot_type
    };

    let attributes = capture_attributes(element);
    let (width, height) = if slot_type == SlotType::Image {
        image_dimensions(element)
    } else {
        (None, None)
    };
    let list_template = if slot_type == SlotType::List {
        capture_list_template(node)
    } else {
        None
    };
    let (max_length, word_count) = budgets(effective_type, &original_content, content_len);

    Some(TemplateSlot {
        id: slot_id,
        slot_type: effective_type,
        label,
        tag_name,
        original_content,
        attributes,
        max_length,
        word_count,
        width,
        height,
        list_template,
    })
}

fn in_denylisted_container(node: &NodeRef) -> bool {
    for ancestor in std::iter::once(node.clone()).chain(node.ancestors()) {
        if let Some(element) = ancestor.as_element() {
            if let Some(class) = element.attributes.borrow().get("class") {
                if class
                    .split_whitespace()
                    .any(|c| CONTAINER_DENYLIST.contains(&c.to_lowercase().as_str()))
                {
                    return true;
                }
            }
        }
    }
    false
}

fn type_key(slot_type: SlotType) -> &'static str {
    match slot_type {
        SlotType::Headline => "headline",
        SlotType::Subheadline => "subheadline",
        SlotType::Paragraph => "paragraph",
        SlotType::List => "list",
        SlotType::Image => "image",
        SlotType::Cta => "cta",
    }
}

/// Lowercase, non-alphanumeric runs collapsed to `_`, cut at `max` chars.
fn slugify(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut last_was_separator = false;
    for c in text.to_lowercase().chars() {
        if out.chars().count() >= max {
            break;
        }
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_separator = false;
        } else if !last_was_separator {
            out.push('_');
            last_was_separator = true;
        }
    }
    out
}

/// `save_20_today` -> `Save 20 Today`.
fn labelize(id: &str) -> String {
    id.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn list_item_texts(list_node: &NodeRef) -> Vec<String> {
    let mut items = Vec::new();
    if let Ok(list_items) = list_node.select("li") {
        for item in list_items {
            let text = item.as_node().text_contents().trim().to_string();
            if !text.is_empty() {
                items.push(text);
            }
        }
    }
    items
}

fn capture_attributes(element: &NodeDataRef<ElementData>) -> Option<String> {
    let attrs = element.attributes.borrow();
    let captured: Vec<String> = attrs
        .map
        .iter()
        .filter(|(name, _)| {
            let local: &str = &name.local;
            local != SLOT_ATTR && local != "src" && local != "width" && local != "height"
        })
        .map(|(name, attr)| format!("{}=\"{}\"", name.local, attr.value))
        .collect();
    if captured.is_empty() {
        None
    } else {
        Some(captured.join(" "))
    }
}

/// Pixel dimensions from width/height attributes, falling back to inline
/// `style="width: Npx"` declarations.
fn image_dimensions(element: &NodeDataRef<ElementData>) -> (Option<u32>, Option<u32>) {
    let attrs = element.attributes.borrow();
    let mut width = attrs.get("width").and_then(|w| w.trim().parse().ok());
    let mut height = attrs.get("height").and_then(|h| h.trim().parse().ok());
    if width.is_none() || height.is_none() {
        if let Some(style) = attrs.get("style") {
            if width.is_none() {
                width = style_width_re()
                    .captures(style)
                    .and_then(|c| c[1].parse().ok());
            }
            if height.is_none() {
                height = style_height_re()
                    .captures(style)
                    .and_then(|c| c[1].parse().ok());
            }
        }
    }
    (width, height)
}

/// Capture the decoration pattern of the first `<li>` when it wraps its text
/// in extra markup (icons, checkmarks), substituting the text with
/// `{{CONTENT}}` so the decoration can be replayed around new items.
fn capture_list_template(list_node: &NodeRef) -> Option<String> {
    let first_item = list_node.select_first("li").ok()?;
    let item_node = first_item.as_node();
    let has_element_children = item_node.children().any(|c| c.as_element().is_some());
    if !has_element_children {
        return None;
    }
    let text = item_node.text_contents().trim().to_string();
    if text.is_empty() {
        return None;
    }
    let inner = inner_html(item_node);
    let pattern = inner.replacen(&text, LIST_CONTENT_TOKEN, 1);
    if pattern.contains(LIST_CONTENT_TOKEN) {
        Some(pattern)
    } else {
        None
    }
}

/// Length budgets for replacement content, sized so substitutions don't
/// overflow the original visual container.
fn budgets(
    slot_type: SlotType,
    original_content: &str,
    content_len: u32,
) -> (Option<u32>, Option<u32>) {
    let words = original_content.split_whitespace().count() as u32;
    match slot_type {
        SlotType::Headline | SlotType::Subheadline | SlotType::Cta => {
            (Some((content_len + 15).min(100)), Some(words))
        }
        SlotType::Paragraph => (
            Some(((content_len as f64 * 1.2) as u32).min(500)),
            Some(words),
        ),
        SlotType::List => (
            Some(((content_len as f64 * 1.2) as u32).min(800)),
            Some(words),
        ),
        SlotType::Image => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_headline_short_paragraph_and_long_paragraph() {
        let html = "<div><h2>Save 20% Today</h2><p>Short label</p>\
                    <p>This is a much longer paragraph of marketing copy that goes on \
                    for quite a while to exceed one hundred characters easily.</p></div>";
        let detected = detect_slots(html);
        assert_eq!(detected.slots.len(), 3);
        assert_eq!(detected.slots[0].slot_type, SlotType::Headline);
        assert_eq!(detected.slots[0].tag_name, "h2");
        // Short <p> is promoted to headline; the tag name stays authoritative.
        assert_eq!(detected.slots[1].slot_type, SlotType::Headline);
        assert_eq!(detected.slots[1].tag_name, "p");
        assert_eq!(detected.slots[2].slot_type, SlotType::Paragraph);
    }

    #[test]
    fn detection_is_idempotent() {
        let html = "<div><h1>Big headline here</h1><p>A paragraph with enough text to count.</p></div>";
        let first = detect_slots(html);
        assert_eq!(first.slots.len(), 2);
        let second = detect_slots(&first.html_body);
        assert!(second.slots.is_empty());
    }

    #[test]
    fn marks_elements_with_slot_ids() {
        let detected = detect_slots("<div><h1>Hello World Offer</h1><p>Plenty of text right here.</p></div>");
        for slot in &detected.slots {
            assert!(detected
                .html_body
                .contains(&format!("data-slot=\"{}\"", slot.id)));
        }
    }

    #[test]
    fn skips_denylisted_regions() {
        let html = "<div><div class=\"sidebar\"><p>Navigation text to ignore</p></div>\
                    <p>Real content paragraph that should be detected fine.</p></div>";
        let detected = detect_slots(html);
        assert_eq!(detected.slots.len(), 1);
        assert!(detected.slots[0].original_content.starts_with("Real content"));
    }

    #[test]
    fn picks_densest_container_over_body() {
        let html = "<div class=\"nav\"><p>menu menu menu</p></div>\
                    <div id=\"main\"><h2>Product story</h2><p>First paragraph of real copy.</p>\
                    <p>Second paragraph of real copy.</p></div>";
        let detected = detect_slots(html);
        // Only the #main contents survive; nav text is not in the output body.
        assert!(!detected.html_body.contains("menu menu"));
        assert_eq!(detected.slots.len(), 3);
    }

    #[test]
    fn list_content_is_line_delimited() {
        let html = "<div><p>Intro paragraph with enough length.</p>\
                    <ul><li>First point</li><li>Second point</li></ul></div>";
        let detected = detect_slots(html);
        let list = detected
            .slots
            .iter()
            .find(|s| s.slot_type == SlotType::List)
            .unwrap();
        assert_eq!(list.original_content, "First point\nSecond point");
        assert_eq!(list.tag_name, "ul");
    }

    #[test]
    fn captures_list_decoration_pattern() {
        let html = "<div><p>Intro paragraph with enough length.</p>\
                    <ul><li><i class=\"fa fa-check\"></i> Builds muscle</li><li><i class=\"fa fa-check\"></i> Boosts focus</li></ul></div>";
        let detected = detect_slots(html);
        let list = detected
            .slots
            .iter()
            .find(|s| s.slot_type == SlotType::List)
            .unwrap();
        let pattern = list.list_template.as_deref().unwrap();
        assert!(pattern.contains("fa-check"));
        assert!(pattern.contains(LIST_CONTENT_TOKEN));
    }

    #[test]
    fn captures_image_slot_with_dimensions() {
        let html = "<div><p>A paragraph so the region qualifies as content.</p>\
                    <img src=\"/hero.png\" alt=\"Hero shot\" width=\"640\" height=\"480\" class=\"hero\"></div>";
        let detected = detect_slots(html);
        let image = detected
            .slots
            .iter()
            .find(|s| s.slot_type == SlotType::Image)
            .unwrap();
        assert_eq!(image.original_content, "/hero.png");
        assert_eq!(image.width, Some(640));
        assert_eq!(image.height, Some(480));
        let attrs = image.attributes.as_deref().unwrap();
        assert!(attrs.contains("class=\"hero\""));
        assert!(!attrs.contains("src="));
        assert!(!attrs.contains("width="));
    }

    #[test]
    fn image_dimensions_fall_back_to_inline_style() {
        let html = "<div><p>A paragraph so the region qualifies as content.</p>\
                    <img src=\"/x.png\" alt=\"pic\" style=\"width: 200px; height: 100px;\"></div>";
        let detected = detect_slots(html);
        let image = detected
            .slots
            .iter()
            .find(|s| s.slot_type == SlotType::Image)
            .unwrap();
        assert_eq!(image.width, Some(200));
        assert_eq!(image.height, Some(100));
    }

    #[test]
    fn colliding_ids_get_numeric_suffixes() {
        let html = "<div><p>Repeated text here</p><p>Repeated text here</p>\
                    <p>Repeated text here</p></div>";
        let detected = detect_slots(html);
        let ids: Vec<&str> = detected.slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[1], format!("{}_1", ids[0]));
        assert_eq!(ids[2], format!("{}_2", ids[0]));
    }

    #[test]
    fn tiny_text_is_skipped() {
        let detected = detect_slots("<div><p>ok</p><p>Long enough paragraph to count.</p></div>");
        assert_eq!(detected.slots.len(), 1);
    }

    #[test]
    fn heading_budget_is_length_plus_fifteen_capped() {
        let html = "<div><h1>Huge Savings</h1><p>Enough paragraph text for the region.</p></div>";
        let detected = detect_slots(html);
        let headline = &detected.slots[0];
        let len = headline.original_content.chars().count() as u32;
        assert_eq!(headline.max_length, Some((len + 15).min(100)));
    }

    #[test]
    fn empty_and_garbage_input_degrade_to_no_slots() {
        assert!(detect_slots("").slots.is_empty());
        assert!(detect_slots("   ").slots.is_empty());
        let detected = detect_slots("<<<not <html <at all");
        assert!(detected.slots.is_empty());
    }
}
