//! CSS post-processing using lightningcss.
//!
//! One parse serves both outputs: the stylesheet is lowered and prefixed
//! for the configured browsers, then printed twice.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

/// Readable and minified forms of one stylesheet.
#[derive(Debug, Clone)]
pub struct CssOutput {
    pub pretty: String,
    pub minified: String,
}

/// Resolve browserslist queries into lightningcss targets.
pub fn browser_targets(queries: &[String]) -> Result<Targets> {
    let browsers = Browsers::from_browserslist(queries.iter()).map_err(|e| anyhow!("{e}"))?;
    Ok(Targets {
        browsers,
        ..Targets::default()
    })
}

/// Prefix `source` for `targets`, then print it pretty and minified.
///
/// lightningcss only adds prefixes while minifying, so the pretty output
/// is the minified stylesheet printed with indentation: rules may be
/// merged and values shortened. Comments are stripped from the minified
/// output, license comments included.
pub fn process(source: &str, filename: &str, targets: Targets) -> Result<CssOutput> {
    let options = ParserOptions {
        filename: filename.to_string(),
        ..ParserOptions::default()
    };
    let mut stylesheet = StyleSheet::parse(source, options).map_err(|e| anyhow!("{e}"))?;

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?;

    let pretty = stylesheet
        .to_css(PrinterOptions {
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?
        .code;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?
        .code;

    Ok(CssOutput {
        pretty,
        minified: strip_comments(&minified),
    })
}

/// Remove every `/* ... */` block outside string literals.
pub fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_targets() -> Targets {
        browser_targets(&["last 8 versions".to_string()]).unwrap()
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a{}/* x */b{}"), "a{}b{}");
        assert_eq!(strip_comments("/*! license */a{}"), "a{}");
        assert_eq!(
            strip_comments(r#"a{content:"/* keep */"}"#),
            r#"a{content:"/* keep */"}"#
        );
        assert_eq!(strip_comments(r"a{content:'\'/*'}/**/"), r"a{content:'\'/*'}");
    }

    #[test]
    fn test_strip_comments_unterminated() {
        assert_eq!(strip_comments("a{}/* open"), "a{}");
    }

    #[test]
    fn test_process_outputs() {
        let out = process(".a {\n  color: red;\n}\n", "style.css", default_targets()).unwrap();
        assert!(out.pretty.contains(".a"));
        assert!(out.pretty.contains('\n'));
        assert!(!out.minified.contains('\n'));
        assert!(out.minified.contains(".a{color:red}"));
    }

    #[test]
    fn test_process_adds_prefixes() {
        let targets = browser_targets(&["ie 10".to_string()]).unwrap();
        let out = process(".a { display: flex; }", "style.css", targets).unwrap();
        assert!(out.pretty.contains("-ms-flexbox"));
    }

    #[test]
    fn test_pretty_output_is_indented_per_rule() {
        let source = ".a { color: red; }\n.b { margin: 0; }\n";
        let out = process(source, "style.css", default_targets()).unwrap();
        assert!(out.pretty.contains(".a {\n  color: red;\n}"), "{}", out.pretty);
        assert!(out.pretty.contains(".b {\n  margin: 0;\n}"), "{}", out.pretty);
        assert!(out.minified.contains(".a{color:red}.b{margin:0}"));
    }

    #[test]
    fn test_process_drops_comments() {
        let out = process("/*! banner */\n.a { color: red; }", "style.css", default_targets())
            .unwrap();
        assert!(!out.minified.contains("banner"));
    }

    #[test]
    fn test_process_is_stable() {
        let source = ".b { margin: 0 auto; }\n.a { color: #ff0000; }";
        let first = process(source, "style.css", default_targets()).unwrap();
        let second = process(source, "style.css", default_targets()).unwrap();
        assert_eq!(first.minified, second.minified);
    }

    #[test]
    fn test_browser_targets_invalid_query() {
        assert!(browser_targets(&["not a browser 99".to_string()]).is_err());
    }
}
