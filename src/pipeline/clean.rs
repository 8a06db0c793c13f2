//! Clean: delete the build root.

use std::fs;
use std::io::ErrorKind;

use crate::config::KilnConfig;
use crate::debug;

use super::StepError;

/// Remove the build root and everything under it.
///
/// A build root that does not exist is already clean.
pub fn clean(config: &KilnConfig) -> Result<(), StepError> {
    let build = config.build_dir();
    match fs::remove_dir_all(build) {
        Ok(()) => {
            debug!("clean"; "removed {}", config.root_relative(build).display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StepError::io(build)(e)),
    }
}
