//! Images: recompress PNG/JPEG, rewrite SVG, copy everything else.
//!
//! Whichever of the original and the optimized bytes is smaller is written.

use std::path::PathBuf;

use crate::config::KilnConfig;
use crate::core::Category;
use crate::debug;
use crate::transform::image::{self, ImageKind};
use crate::transform::svg;

use super::{StepError, collect_sources, read_bytes, write_output};

pub(super) fn run(config: &KilnConfig) -> Result<Vec<PathBuf>, StepError> {
    let spec = config.spec(Category::Images);
    let options = &config.images;

    let mut written = Vec::new();
    for source in collect_sources(spec)? {
        let original = read_bytes(&source.path)?;
        let original_len = original.len();

        let optimized = match ImageKind::from_path(&source.path) {
            ImageKind::Png => image::optimize_png(&original, options),
            ImageKind::Jpeg => image::optimize_jpeg(&original, options),
            ImageKind::Svg => svg::optimize(&original),
            ImageKind::Other => Ok(original.clone()),
        }
        .map_err(|e| StepError::transform(&source.path, &e))?;
        let bytes = image::smaller(original, optimized);

        let output = source.output_same(&spec.dest);
        write_output(&output, &bytes)?;

        debug!(
            "images"; "{} ({} -> {} bytes)",
            config.root_relative(&source.path).display(),
            original_len,
            bytes.len()
        );
        written.push(output);
    }

    Ok(written)
}
