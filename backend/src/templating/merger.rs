//! # Template Merge
//!
//! Re-injects slot content into a slot-tagged template body. Text goes in as
//! literal text nodes (never markup), list content is split on newlines and
//! rebuilt as `<li>` items with any captured decoration pattern replayed
//! around each line, image slots get their `src` swapped (with junk-URL
//! fallback to a sized placeholder), and CTA slots get their `href`
//! rewritten while the link text is preserved.
//!
//! The same DOM merge backs the live preview and the static-site export;
//! [`build_static_files`] wraps the merged body into a full document plus a
//! `styles.css`.

use crate::templating::inner_html;
use crate::templating::slot_detector::{LIST_CONTENT_TOKEN, SLOT_ATTR};
use common::model::slot::SlotType;
use common::model::template::{StaticFile, TemplateConfig};
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Leading bullet or numbering markers stripped from AI-written list lines.
fn bullet_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9+.•*\-]+\s*").unwrap())
}

/// Merge slot content into the template body and return the merged fragment.
///
/// Slots without content keep whatever the template currently holds; a body
/// that cannot be parsed is returned unmerged. This function never fails.
pub fn merge_html(
    template: &TemplateConfig,
    text_data: &HashMap<String, String>,
    image_data: &HashMap<String, String>,
) -> String {
    if template.html_body.is_empty() {
        return String::new();
    }

    let document = kuchiki::parse_html().one(template.html_body.clone());
    let body = match document.select_first("body") {
        Ok(body) => body.as_node().clone(),
        Err(()) => return template.html_body.clone(),
    };

    for slot in &template.slots {
        let selector = format!("[{}=\"{}\"]", SLOT_ATTR, slot.id);
        let Ok(element) = body.select_first(&selector) else {
            continue;
        };
        let node = element.as_node().clone();

        if let Some(content) = text_data.get(&slot.id).filter(|c| !c.trim().is_empty()) {
            match slot.slot_type {
                SlotType::List => inject_list(&node, content, slot.list_template.as_deref()),
                SlotType::Cta => {
                    element
                        .attributes
                        .borrow_mut()
                        .insert("href", content.clone());
                }
                _ => set_text(&node, content),
            }
        }

        if slot.slot_type == SlotType::Image {
            let final_src = match image_data.get(&slot.id).filter(|s| !s.trim().is_empty()) {
                Some(src) => src.clone(),
                None => {
                    let original = element
                        .attributes
                        .borrow()
                        .get("src")
                        .unwrap_or("")
                        .to_string();
                    if is_junk_url(&original) {
                        let width = slot.width.unwrap_or(300);
                        let height = slot.height.unwrap_or(200);
                        format!(
                            "https://placehold.co/{}x{}?text=Missing+Image",
                            width, height
                        )
                    } else {
                        original
                    }
                }
            };
            if !final_src.is_empty() {
                let mut attrs = element.attributes.borrow_mut();
                attrs.insert("src", final_src);
                // A stale srcset would override the new src in the browser.
                attrs.remove("srcset");
            }
        }
    }

    inner_html(&body)
}

/// Split a single slot-data overlay into the text and image maps the merger
/// consumes, based on each slot's type.
pub fn split_slot_data(
    template: &TemplateConfig,
    slot_data: &HashMap<String, String>,
) -> (HashMap<String, String>, HashMap<String, String>) {
    let mut text_data = HashMap::new();
    let mut image_data = HashMap::new();
    for slot in &template.slots {
        if let Some(content) = slot_data.get(&slot.id) {
            if slot.slot_type.is_text() {
                text_data.insert(slot.id.clone(), content.clone());
            } else {
                image_data.insert(slot.id.clone(), content.clone());
            }
        }
    }
    (text_data, image_data)
}

/// Merge the overlay and wrap the result into a downloadable static site:
/// an `index.html` with the CSS inlined, plus the bare `styles.css`.
pub fn build_static_files(
    template: &TemplateConfig,
    slot_data: &HashMap<String, String>,
) -> Vec<StaticFile> {
    let (text_data, image_data) = split_slot_data(template, slot_data);
    let body = merge_html(template, &text_data, &image_data);
    let css = template.css.clone().unwrap_or_default();
    vec![
        StaticFile {
            path: "index.html".to_string(),
            contents: wrap_page(template, &body),
        },
        StaticFile {
            path: "styles.css".to_string(),
            contents: css,
        },
    ]
}

/// Wrap a merged body fragment into a complete HTML5 document.
pub fn wrap_page(template: &TemplateConfig, body: &str) -> String {
    let head_links = template
        .head_content
        .as_deref()
        .map(|h| format!("{}\n", h))
        .unwrap_or_default();
    let css = template.css.as_deref().unwrap_or("");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  \
         <title>{}</title>\n{}  <style>\n{}\n  </style>\n</head>\n<body>\n{}\n</body>\n</html>",
        escape_html(&template.name),
        head_links,
        css,
        body
    )
}

fn set_text(node: &NodeRef, content: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.append(NodeRef::new_text(content));
}

fn inject_list(list_node: &NodeRef, content: &str, list_template: Option<&str>) {
    let items: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| bullet_marker_re().replace(line, "").to_string())
        .collect();
    if items.is_empty() {
        return;
    }

    let pattern = list_template.filter(|p| p.contains(LIST_CONTENT_TOKEN));
    let mut items_html = String::new();
    for item in &items {
        let escaped = escape_html(item);
        match pattern {
            Some(p) => {
                items_html.push_str("<li>");
                items_html.push_str(&p.replace(LIST_CONTENT_TOKEN, &escaped));
                items_html.push_str("</li>");
            }
            None => {
                items_html.push_str("<li>");
                items_html.push_str(&escaped);
                items_html.push_str("</li>");
            }
        }
    }

    let fragment = kuchiki::parse_html().one(format!("<ul>{}</ul>", items_html));
    let Ok(new_list) = fragment.select_first("ul") else {
        return;
    };

    let old_children: Vec<NodeRef> = list_node.children().collect();
    for child in old_children {
        child.detach();
    }
    let new_items: Vec<NodeRef> = new_list.as_node().children().collect();
    for item in new_items {
        list_node.append(item);
    }
}

/// Analytics pixels, local-filesystem paths and Word/HTML-export artifacts
/// that would render as broken images on the published page.
pub fn is_junk_url(url: &str) -> bool {
    if url.is_empty() {
        return true;
    }
    let lower = url.to_lowercase();
    lower.contains("googletagmanager.com")
        || lower.contains("file://")
        || lower.contains("_files/")
        || lower.contains("localhost")
        || lower.contains("127.0.0.1")
        || lower.contains("%20")
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
