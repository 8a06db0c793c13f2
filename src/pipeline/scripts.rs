//! Scripts: includes → transpiled `<stem>.js` and minified `<stem>.min.js`.

use std::path::PathBuf;

use crate::config::KilnConfig;
use crate::core::Category;
use crate::debug;
use crate::transform::{include, js};

use super::{StepError, collect_sources, min_path, read_text, write_output};

pub(super) fn run(config: &KilnConfig) -> Result<Vec<PathBuf>, StepError> {
    let spec = config.spec(Category::Scripts);
    let target = &config.scripts.target;

    let mut written = Vec::new();
    for source in collect_sources(spec)? {
        let text = read_text(&source.path)?;
        let transform_err = |e: anyhow::Error| StepError::transform(&source.path, &e);

        // Directives are comments; resolve them before the transpiler drops them.
        let bundled = include::resolve(&text, &source.path).map_err(transform_err)?;
        let transpiled = js::transpile(&bundled, &source.path, target).map_err(transform_err)?;
        let minified = js::minify(&transpiled).map_err(transform_err)?;

        let plain_path = source.output(&spec.dest, "js");
        let min_path = min_path(&plain_path, "js");
        write_output(&plain_path, &transpiled)?;
        write_output(&min_path, &minified)?;

        debug!(
            "scripts"; "{} -> {}",
            config.root_relative(&source.path).display(),
            config.root_relative(&min_path).display()
        );
        written.push(plain_path);
        written.push(min_path);
    }

    Ok(written)
}
