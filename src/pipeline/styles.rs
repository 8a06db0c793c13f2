//! Styles: SCSS → prefixed `<stem>.css` and minified `<stem>.min.css`.

use std::path::PathBuf;

use crate::config::KilnConfig;
use crate::core::Category;
use crate::debug;
use crate::transform::{css, sass};

use super::{StepError, collect_sources, min_path, write_output};

pub(super) fn run(config: &KilnConfig) -> Result<Vec<PathBuf>, StepError> {
    let spec = config.spec(Category::Styles);
    let config_file = config.config_path.as_deref().unwrap_or(&config.root);
    let targets = css::browser_targets(&config.styles.browsers)
        .map_err(|e| StepError::transform(config_file, &e))?;

    let mut written = Vec::new();
    for source in collect_sources(spec)? {
        let compiled =
            sass::compile(&source.path).map_err(|e| StepError::transform(&source.path, &e))?;

        let filename = source.path.to_string_lossy();
        let output = css::process(&compiled, &filename, targets)
            .map_err(|e| StepError::transform(&source.path, &e))?;

        let pretty_path = source.output(&spec.dest, "css");
        let min_path = min_path(&pretty_path, "css");
        write_output(&pretty_path, &output.pretty)?;
        write_output(&min_path, &output.minified)?;

        debug!(
            "styles"; "{} -> {}",
            config.root_relative(&source.path).display(),
            config.root_relative(&min_path).display()
        );
        written.push(pretty_path);
        written.push(min_path);
    }

    Ok(written)
}
