//! # Templating Pipeline
//!
//! The core transforms behind the template service. Everything in here is a
//! pure function over strings and parsed DOM trees; no I/O, no shared state.
//!
//! Data flows through the modules in this order:
//!
//! 1. `url_resolver` - rewrites relative resource URLs in scraped HTML into
//!    absolute ones and splits a full document into head/style/body parts.
//! 2. `slot_detector` - finds the main content region, extracts editable
//!    slots (headings, paragraphs, lists, images), and tags each element
//!    with a stable `data-slot` attribute.
//! 3. `fields` - derives AI-facing field definitions (type + length budget)
//!    from the detected slots.
//! 4. `json_repair` - best-effort parsing of the AI collaborator's JSON
//!    response into a slot-data map.
//! 5. `merger` - re-injects slot content into the tagged elements and
//!    assembles the final preview page or static file pair.
//!
//! All modules share one HTML parser (`kuchiki`); there is deliberately no
//! separate regex-based merge path for server-side use.

pub mod fields;
pub mod json_repair;
pub mod merger;
pub mod slot_detector;
pub mod url_resolver;

use kuchiki::NodeRef;

/// Serialize a node (the node itself plus its subtree) to an HTML string.
pub(crate) fn outer_html(node: &NodeRef) -> String {
    let mut buf = Vec::new();
    if node.serialize(&mut buf).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serialize only the children of a node, i.e. its inner HTML.
pub(crate) fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| outer_html(&child)).collect()
}
