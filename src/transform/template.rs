//! View rendering using minijinja.
//!
//! Templates load from the views glob base, so `{% extends %}` and
//! `{% include %}` resolve against the same directory tree the entry
//! templates come from.

use std::path::Path;

use anyhow::{Result, anyhow};
use minijinja::{Environment, Value, path_loader};

/// A template environment for one run of the views step.
///
/// The environment caches parsed templates, so a fresh one is built per
/// run to pick up edits.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Create a renderer loading from `base`, with `globals` visible to
    /// every template.
    pub fn new(base: &Path, globals: &toml::Table) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(base));
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        for (key, value) in globals {
            env.add_global(key.clone(), Value::from_serialize(value));
        }

        Self { env }
    }

    /// Render the template at `name`, a `/`-separated path under the base.
    pub fn render(&self, name: &str) -> Result<String> {
        let template = self.env.get_template(name).map_err(|e| anyhow!("{e:#}"))?;
        template
            .render(minijinja::context! {})
            .map_err(|e| anyhow!("{e:#}"))
    }
}

/// Loader name for `path` relative to `base`.
pub fn template_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_with_layout_and_globals() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("layout")).unwrap();
        fs::write(
            dir.path().join("layout/base.jinja"),
            "<html>\n<title>{{ title }}</title>\n{% block body %}{% endblock %}\n</html>\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("index.jinja"),
            "{% extends \"layout/base.jinja\" %}\n{% block body %}<p>hi</p>{% endblock %}\n",
        )
        .unwrap();

        let globals: toml::Table = toml::from_str("title = \"Home\"").unwrap();
        let html = Renderer::new(dir.path(), &globals).render("index.jinja").unwrap();

        assert!(html.contains("<title>Home</title>"));
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn test_render_trims_blocks() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("list.jinja"),
            "<ul>\n  {% for i in [1, 2] %}\n<li>{{ i }}</li>\n  {% endfor %}\n</ul>\n",
        )
        .unwrap();

        let html = Renderer::new(dir.path(), &toml::Table::new())
            .render("list.jinja")
            .unwrap();
        assert_eq!(html, "<ul>\n<li>1</li>\n<li>2</li>\n</ul>\n");
    }

    #[test]
    fn test_render_syntax_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.jinja"), "{% if %}").unwrap();

        let result = Renderer::new(dir.path(), &toml::Table::new()).render("bad.jinja");
        assert!(result.is_err());
    }

    #[test]
    fn test_template_name() {
        let base = Path::new("/site/src/view");
        assert_eq!(
            template_name(base, Path::new("/site/src/view/blog/post.jinja")).as_deref(),
            Some("blog/post.jinja")
        );
        assert_eq!(template_name(base, Path::new("/elsewhere/a.jinja")), None);
    }
}
