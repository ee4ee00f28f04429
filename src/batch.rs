use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{DfmError, Result};
use crate::router::{FileRouter, MediaKind};

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, DfmError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Reject `--output` for multi-input runs; checked before touching the filesystem
pub fn check_output_arity(input_count: usize, output: Option<&Path>) -> Result<()> {
    if input_count > 1 && output.is_some() {
        return Err(DfmError::InvalidArgument(
            "Cannot specify --output when processing multiple files. \
             Files will be saved to the output directory."
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate that every input exists and expand directories into the media files they contain
pub fn resolve_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(DfmError::NotFound(input.display().to_string()));
        }

        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| MediaKind::from_path(p).is_ok())
                .collect();
            found.sort();

            info!("Found {} media files in {}", found.len(), input.display());
            resolved.extend(found);
        } else {
            resolved.push(input.clone());
        }
    }

    Ok(resolved)
}

/// Sequentially processes a list of inputs through one router
pub struct BatchRunner<'a> {
    router: &'a FileRouter,
    keep_going: bool,
    show_progress: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(router: &'a FileRouter, keep_going: bool, show_progress: bool) -> Self {
        Self {
            router,
            keep_going,
            show_progress,
        }
    }

    /// Process every input in order. Without `keep_going` the first failure is returned as-is.
    pub async fn run(&self, inputs: &[PathBuf], output: Option<&Path>) -> Result<BatchReport> {
        check_output_arity(inputs.len(), output)?;

        let mut report = BatchReport::default();
        let total = inputs.len();

        for (index, input) in inputs.iter().enumerate() {
            if total > 1 && self.show_progress {
                println!("\n[{}/{}] Processing {}", index + 1, total, input.display());
            }

            match self.router.process_file(input, output).await {
                Ok(written) => {
                    if self.show_progress {
                        println!("✓ Saved to: {}\n", written.display());
                    }
                    report.succeeded.push((input.clone(), written));
                }
                Err(e) if self.keep_going => {
                    warn!("Failed to process {}: {}", input.display(), e);
                    report.failed.push((input.clone(), e));
                }
                Err(e) => return Err(e),
            }
        }

        if self.show_progress && total > 1 {
            println!("✓ Successfully processed {} file(s)", report.succeeded.len());
            for (input, e) in &report.failed {
                println!("✗ {}: {}", input.display(), e);
            }
        }

        Ok(report)
    }
}
