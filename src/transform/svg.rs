//! SVG optimization using usvg.
//!
//! Parsing normalizes the document (resolves styles, drops editor
//! metadata and comments) and writing emits it without indentation.
//! usvg folds the `viewBox` transform into the content, so a source with a
//! `viewBox` gets one back spanning the output size. Documents with content
//! usvg flattens or drops (text, links, scripts, style sheets) are
//! returned unchanged.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

/// Opening tag of the root `<svg>` element.
static ROOT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<svg(?:[ \t\r\n/][^>]*)?>").unwrap());

/// `viewBox` attribute, either quote style.
static VIEWBOX_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[ \t\r\n]viewBox[ \t\r\n]*=[ \t\r\n]*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Elements that do not survive a usvg round trip.
static UNSUPPORTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"<(?:[A-Za-z_][A-Za-z0-9_.-]*:)?(?:text|tspan|textPath|a|script|style|foreignObject|switch)[ \t\r\n/>]",
    )
    .unwrap()
});

/// Rewrite an SVG document through usvg.
pub fn optimize(content: &[u8]) -> Result<Vec<u8>> {
    let source = std::str::from_utf8(content).context("SVG is not valid UTF-8")?;
    let tree =
        usvg::Tree::from_str(source, &usvg::Options::default()).context("Failed to parse SVG")?;

    if UNSUPPORTED.is_match(source) {
        return Ok(content.to_vec());
    }

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        attributes_indent: usvg::Indent::None,
        ..Default::default()
    };
    let optimized = tree.to_string(&write_options);

    let optimized = if root_viewbox(source).is_some() {
        let size = tree.size();
        let viewbox = format!("0 0 {} {}", size.width(), size.height());
        set_root_viewbox(&optimized, &viewbox)
    } else {
        optimized
    };

    Ok(optimized.into_bytes())
}

/// `viewBox` of the root element, if it has one.
fn root_viewbox(svg: &str) -> Option<&str> {
    let tag = ROOT_TAG.find(svg)?;
    let caps = VIEWBOX_ATTR.captures(tag.as_str())?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Replace or insert the root element's `viewBox`.
fn set_root_viewbox(svg: &str, viewbox: &str) -> String {
    let Some(tag) = ROOT_TAG.find(svg) else {
        return svg.to_string();
    };
    let tag_text = tag.as_str();

    let new_tag = match VIEWBOX_ATTR.find(tag_text) {
        Some(attr) => format!(
            "{} viewBox=\"{viewbox}\"{}",
            &tag_text[..attr.start()],
            &tag_text[attr.end()..]
        ),
        None => format!("<svg viewBox=\"{viewbox}\"{}", &tag_text[4..]),
    };

    format!("{}{new_tag}{}", &svg[..tag.start()], &svg[tag.end()..])
}
