//! Live reload script injection into served HTML.

use crate::embed::livereload_tag;

/// Insert the live reload tag before the last `</body>`, or append it.
pub fn inject_livereload(content: &[u8]) -> Vec<u8> {
    let script = livereload_tag();
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    let pos = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
        .unwrap_or(content.len());

    let mut result = Vec::with_capacity(content.len() + script_bytes.len());
    result.extend_from_slice(&content[..pos]);
    result.extend_from_slice(script_bytes);
    result.extend_from_slice(&content[pos..]);
    result
}

/// Inject only into HTML responses.
pub fn maybe_inject_livereload(body: Vec<u8>, content_type: &str) -> Vec<u8> {
    if content_type.starts_with("text/html") {
        inject_livereload(&body)
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mime::types::{CSS, HTML};

    fn injected(html: &str) -> String {
        String::from_utf8(inject_livereload(html.as_bytes())).unwrap()
    }

    #[test]
    fn test_inserted_before_body_close() {
        let out = injected("<html><body><p>hi</p></body></html>");
        let tag = livereload_tag();
        assert_eq!(out, format!("<html><body><p>hi</p>{tag}</body></html>"));
    }

    #[test]
    fn test_last_body_close_wins_case_insensitive() {
        let out = injected("<pre>&lt;/body&gt; </body></pre></BODY>");
        assert!(out.ends_with(&format!("{}</BODY>", livereload_tag())));
    }

    #[test]
    fn test_appended_without_body() {
        let out = injected("<p>fragment</p>");
        assert_eq!(out, format!("<p>fragment</p>{}", livereload_tag()));
    }

    #[test]
    fn test_non_html_untouched() {
        let css = b"body{color:red}".to_vec();
        assert_eq!(maybe_inject_livereload(css.clone(), CSS), css);
        assert_ne!(maybe_inject_livereload(b"<p></p>".to_vec(), HTML), b"<p></p>".to_vec());
    }
}
