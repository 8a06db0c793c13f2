//! Views: render templates to `<stem>.html`.

use rustc_hash::FxHashMap;
use std::path::PathBuf;

use crate::config::KilnConfig;
use crate::core::Category;
use crate::debug;
use crate::transform::template::{Renderer, template_name};

use super::{StepError, collect_sources, write_output};

pub(super) fn run(config: &KilnConfig) -> Result<Vec<PathBuf>, StepError> {
    let spec = config.spec(Category::Views);
    let mut renderers: FxHashMap<PathBuf, Renderer> = FxHashMap::default();

    let mut written = Vec::new();
    for source in collect_sources(spec)? {
        let renderer = renderers
            .entry(source.base.clone())
            .or_insert_with(|| Renderer::new(&source.base, &config.views.context));

        let name = template_name(&source.base, &source.path).ok_or_else(|| {
            StepError::transform(&source.path, &anyhow::anyhow!("not under its glob base"))
        })?;
        let html = renderer
            .render(&name)
            .map_err(|e| StepError::transform(&source.path, &e))?;

        let output = source.output(&spec.dest, "html");
        write_output(&output, &html)?;

        debug!(
            "views"; "{} -> {}",
            config.root_relative(&source.path).display(),
            config.root_relative(&output).display()
        );
        written.push(output);
    }

    Ok(written)
}
