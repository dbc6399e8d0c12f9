//! Resolves relative URLs in scraped HTML to absolute URLs.
//!
//! Pages saved or fetched from a website often carry relative paths like
//! `src="/image.png"` or `href="./styles.css"` that break once the markup is
//! rehosted. This module rewrites every URL-bearing attribute of interest,
//! plus `url(...)` references inside `<style>` blocks and inline `style`
//! attributes, against a base URL. When no base is supplied it falls back to
//! a `<base href>` tag and then to the origin of the first absolute URL in
//! the markup; with no base at all the input is returned unchanged.
//!
//! Also hosts the head/body splitting helpers used when a fetched document
//! is turned into a template.

use crate::templating::{inner_html, outer_html};
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Attributes that may contain resource URLs needing resolution.
const URL_ATTRIBUTES: &[&str] = &["src", "href", "data-src", "poster"];

/// Elements that typically carry src or href resource URLs.
const ELEMENTS_WITH_URLS: &str = "img, link, script, a, source, video, audio";

fn base_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<base\s+[^>]*href\s*=\s*["']([^"']+)["'][^>]*>"#).unwrap()
    })
}

fn absolute_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:src|href)\s*=\s*["'](https?://[^"']+)["']"#).unwrap()
    })
}

fn css_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)url\s*\(\s*["']?([^"')]+)["']?\s*\)"#).unwrap())
}

/// A URL is relative when it carries no scheme we must leave alone.
fn is_relative_url(url: &str) -> bool {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.starts_with('/')
        || trimmed.starts_with("./")
        || trimmed.starts_with("../")
        || !(trimmed.starts_with("http://")
            || trimmed.starts_with("https://")
            || trimmed.starts_with("data:")
            || trimmed.starts_with("blob:")
            || trimmed.starts_with("mailto:")
            || trimmed.starts_with("tel:"))
}

fn resolve_url(url: &str, base: &Url) -> String {
    let trimmed = url.trim();
    if !is_relative_url(trimmed) {
        return url.to_string();
    }
    match base.join(trimmed) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url.to_string(),
    }
}

/// Base URL from a `<base href="...">` tag, if it is absolute.
fn extract_base_from_html(html: &str) -> Option<String> {
    let captures = base_tag_re().captures(html)?;
    let base = captures[1].trim().to_string();
    if base.starts_with("http") {
        Some(base)
    } else {
        None
    }
}

/// Base URL inferred from the origin of the first absolute URL anywhere in
/// the markup. Useful for pages saved without a `<base>` tag.
fn extract_base_from_absolute_urls(html: &str) -> Option<String> {
    let captures = absolute_url_re().captures(html)?;
    let url = Url::parse(&captures[1]).ok()?;
    Some(format!("{}/", url.origin().ascii_serialization()))
}

fn resolve_css_urls(css: &str, base: &Url) -> String {
    css_url_re()
        .replace_all(css, |caps: &regex::Captures| {
            let raw = caps[1].trim();
            if is_relative_url(raw) {
                format!("url(\"{}\")", resolve_url(raw, base))
            } else {
                format!("url(\"{}\")", raw)
            }
        })
        .into_owned()
}

/// Convert all relative URLs in `html` to absolute URLs against `base_url`.
///
/// Returns the input unchanged when no base can be established; resolution
/// failures leave the individual URL untouched. The output is a serialized
/// document and is not guaranteed to be byte-identical to the input beyond
/// the resolved URLs.
pub fn resolve_urls_in_html(html: &str, base_url: Option<&str>) -> String {
    if html.trim().is_empty() {
        return html.to_string();
    }

    let effective = base_url
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .or_else(|| extract_base_from_html(html))
        .or_else(|| extract_base_from_absolute_urls(html));

    let Some(base) = effective else {
        return html.to_string();
    };

    // Resolution needs a scheme; saved pages sometimes record bare hosts.
    let base = if base.starts_with("http://") || base.starts_with("https://") {
        base
    } else {
        format!("https://{}", base.trim_start_matches('/'))
    };
    let Ok(base) = Url::parse(&base) else {
        return html.to_string();
    };

    let document = kuchiki::parse_html().one(html.to_string());

    if let Ok(elements) = document.select(ELEMENTS_WITH_URLS) {
        for element in elements {
            let mut attrs = element.attributes.borrow_mut();
            for name in URL_ATTRIBUTES {
                let Some(value) = attrs.get(*name).map(str::to_string) else {
                    continue;
                };
                if is_relative_url(&value) {
                    attrs.insert(*name, resolve_url(&value, &base));
                }
            }
        }
    }

    if let Ok(styles) = document.select("style") {
        for style in styles {
            let node = style.as_node();
            let css = node.text_contents();
            if css.contains("url(") {
                set_text_children(node, &resolve_css_urls(&css, &base));
            }
        }
    }
    if let Ok(inline) = document.select("[style]") {
        for element in inline {
            let mut attrs = element.attributes.borrow_mut();
            let Some(style) = attrs.get("style").map(str::to_string) else {
                continue;
            };
            if style.contains("url(") {
                attrs.insert("style", resolve_css_urls(&style, &base));
            }
        }
    }

    outer_html(&document)
}

fn set_text_children(node: &NodeRef, text: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

/// Inner HTML of the document body; falls back to the input for markup the
/// parser cannot shape into a body.
pub fn extract_body_html(html: &str) -> String {
    let document = kuchiki::parse_html().one(html.to_string());
    match document.select_first("body") {
        Ok(body) => inner_html(body.as_node()),
        Err(()) => html.to_string(),
    }
}

/// External stylesheet `<link>` tags from the head, newline-joined, so they
/// can be replayed when the stored body fragment is rendered on its own.
pub fn extract_head_content(html: &str) -> String {
    let document = kuchiki::parse_html().one(html.to_string());
    let mut parts = Vec::new();
    if let Ok(links) = document.select("head link[rel=\"stylesheet\"]") {
        for link in links {
            parts.push(outer_html(link.as_node()));
        }
    }
    parts.join("\n")
}

/// Concatenated text of every `<style>` block in the document.
pub fn extract_css(html: &str) -> String {
    let document = kuchiki::parse_html().one(html.to_string());
    let mut css = String::new();
    if let Ok(styles) = document.select("style") {
        for style in styles {
            let text = style.as_node().text_contents();
            if !text.trim().is_empty() {
                if !css.is_empty() {
                    css.push('\n');
                }
                css.push_str(text.trim());
            }
        }
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_src_against_base() {
        let html = r#"<img src="/a.png">"#;
        let out = resolve_urls_in_html(html, Some("https://x.com/page"));
        assert!(out.contains(r#"src="https://x.com/a.png""#));
    }

    #[test]
    fn leaves_absolute_and_data_urls_untouched() {
        let html = r#"<img src="https://cdn.example.com/a.png"><img src="data:image/png;base64,AAAA">"#;
        let out = resolve_urls_in_html(html, Some("https://x.com/"));
        assert!(out.contains(r#"src="https://cdn.example.com/a.png""#));
        assert!(out.contains(r#"src="data:image/png;base64,AAAA""#));
    }

    #[test]
    fn no_base_available_is_a_noop() {
        let html = r#"<p>hello</p><img src="/a.png">"#;
        assert_eq!(resolve_urls_in_html(html, None), html);
    }

    #[test]
    fn infers_base_from_base_tag() {
        let html = r#"<head><base href="https://shop.example.com/"></head><body><a href="/deal">deal</a></body>"#;
        let out = resolve_urls_in_html(html, None);
        assert!(out.contains(r#"href="https://shop.example.com/deal""#));
    }

    #[test]
    fn infers_base_from_first_absolute_url() {
        let html = r#"<img src="https://shop.example.com/hero.jpg"><img src="/thumb.jpg">"#;
        let out = resolve_urls_in_html(html, None);
        assert!(out.contains(r#"src="https://shop.example.com/thumb.jpg""#));
    }

    #[test]
    fn rewrites_css_urls_in_style_blocks_and_inline_styles() {
        let html = r#"<style>.hero { background: url('/bg.jpg'); }</style><div style="background: url(/inline.png)">x</div>"#;
        let out = resolve_urls_in_html(html, Some("https://x.com/"));
        assert!(out.contains(r#"url("https://x.com/bg.jpg")"#));
        assert!(out.contains("https://x.com/inline.png"));
    }

    #[test]
    fn protocolless_base_gets_https() {
        let out = resolve_urls_in_html(r#"<img src="/a.png">"#, Some("x.com"));
        assert!(out.contains(r#"src="https://x.com/a.png""#));
    }

    #[test]
    fn splits_head_and_body() {
        let html = concat!(
            r#"<html><head><link rel="stylesheet" href="https://x.com/s.css">"#,
            r#"<style>p { color: red; }</style></head>"#,
            r#"<body><p>content</p></body></html>"#
        );
        assert!(extract_head_content(html).contains("s.css"));
        assert_eq!(extract_css(html), "p { color: red; }");
        assert_eq!(extract_body_html(html), "<p>content</p>");
    }
}
