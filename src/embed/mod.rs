//! Embedded static resources for the dev server.
//!
//! # Usage
//!
//! ```ignore
//! use embed::{LIVERELOAD_JS, LivereloadVars};
//!
//! let js = LIVERELOAD_JS.render(&LivereloadVars { ws_port: 35729 });
//! ```

mod template;

pub use template::{Template, TemplateVars};

/// URL the dev server answers with the live reload client.
pub const LIVERELOAD_URL: &str = "/__kiln/livereload.js";

/// Variables for livereload.js.
pub struct LivereloadVars {
    pub ws_port: u16,
}

impl TemplateVars for LivereloadVars {
    fn apply(&self, content: &str) -> String {
        content.replace("__KILN_WS_PORT__", &self.ws_port.to_string())
    }
}

/// Live reload client with WebSocket port injection (minified by build.rs).
pub const LIVERELOAD_JS: Template<LivereloadVars> =
    Template::new(include_str!(concat!(env!("OUT_DIR"), "/livereload.min.js")));

/// Script tag injected into served HTML pages.
pub fn livereload_tag() -> String {
    format!(r#"<script src="{LIVERELOAD_URL}" defer></script>"#)
}
