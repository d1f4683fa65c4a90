//! Publication of the structured artifact
//!
//! Copies the structured catalog to each downstream location. A failed copy
//! is logged and counted; it never fails the run.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    pub copied: usize,
    pub failed: usize,
}

impl PublishOutcome {
    pub fn display_string(&self) -> String {
        if self.copied + self.failed == 0 {
            "no publish targets".to_string()
        } else {
            format!("{} copied, {} failed", self.copied, self.failed)
        }
    }
}

fn copy_to(source: &Path, target: &Path) -> std::io::Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    Ok(())
}

pub fn publish(source: &Path, targets: &[PathBuf]) -> PublishOutcome {
    let mut outcome = PublishOutcome::default();

    for target in targets {
        match copy_to(source, target) {
            Ok(()) => {
                info!(target = %target.display(), "Published structured catalog");
                outcome.copied += 1;
            }
            Err(e) => {
                warn!(target = %target.display(), error = %e, "Failed to publish structured catalog");
                outcome.failed += 1;
            }
        }
    }

    outcome
}
