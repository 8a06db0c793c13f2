//! Build orchestration: clean, then every step in parallel.

use rayon::prelude::*;

use crate::config::KilnConfig;
use crate::core::Category;
use crate::log;
use crate::logger::ProgressLine;
use crate::utils::plural_count;

use super::{Pipeline, StepError, StepResult, clean};

/// Outcome of every step in one build.
#[derive(Debug)]
pub struct BuildReport {
    pub results: Vec<(Category, StepResult)>,
}

impl BuildReport {
    /// Steps that failed, in build order.
    pub fn failures(&self) -> impl Iterator<Item = (Category, &StepError)> {
        self.results
            .iter()
            .filter_map(|(category, result)| result.as_ref().err().map(|e| (*category, e)))
    }

    /// Whether a step failed for a reason other than bad source content.
    pub fn has_io_failure(&self) -> bool {
        self.failures().any(|(_, e)| !e.is_transform())
    }

    /// Total files written by successful steps.
    pub fn written_count(&self) -> usize {
        self.results
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
            .map(|outputs| outputs.written.len())
            .sum()
    }

    /// Print one line per failed step and a summary.
    pub fn log(&self) {
        for (category, err) in self.failures() {
            log!("error"; "{} failed: {}", category, err.detail());
        }

        let failed = self.failures().count();
        if failed == 0 {
            log!("build"; "done, {} written", plural_count(self.written_count(), "file"));
        } else {
            log!(
                "build";
                "done with {} failed, {} written",
                plural_count(failed, "step"),
                plural_count(self.written_count(), "file")
            );
        }
    }
}

/// Clean, then run all five steps concurrently.
pub fn build(pipeline: &Pipeline, quiet: bool) -> Result<BuildReport, StepError> {
    build_with(pipeline.config(), quiet, |category| pipeline.run_step(category))
}

/// Clean, then run `run` once per category concurrently.
///
/// Clean finishes before any step starts. One failing step never cancels
/// the others; every outcome lands in the report.
pub fn build_with<F>(
    config: &KilnConfig,
    quiet: bool,
    run: F,
) -> Result<BuildReport, StepError>
where
    F: Fn(Category) -> StepResult + Sync,
{
    clean(config)?;

    let progress = (!quiet).then(|| ProgressLine::new(&[("steps", Category::ALL.len())]));

    let results = Category::ALL
        .par_iter()
        .map(|&category| {
            let result = run(category);
            if let Some(p) = &progress {
                p.inc("steps");
            }
            (category, result)
        })
        .collect();

    if let Some(p) = progress {
        p.finish();
    }

    Ok(BuildReport { results })
}
