//! Per-invocation staging area.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::WorkerResult;

const STAGING_PREFIX: &str = "rclip-stage-";
const INPUT_DIR: &str = "input";
const OUTPUT_DIR: &str = "output";

/// Scratch directory owned by exactly one invocation.
///
/// Downloaded inputs land flat in `input/`, the transcoder writes into
/// `output/`. The directory is removed when the area is released or
/// dropped, whichever comes first, so every early return cleans up.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a fresh staging area under `root` (system temp dir when `None`).
    pub fn create(root: Option<&Path>) -> WorkerResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);

        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        std::fs::create_dir(dir.path().join(INPUT_DIR))?;
        std::fs::create_dir(dir.path().join(OUTPUT_DIR))?;
        debug!("Created staging area {}", dir.path().display());

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Local path for a downloaded input with the given base name.
    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(INPUT_DIR).join(file_name)
    }

    /// Local path for a transcoder output with the given file name.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(OUTPUT_DIR).join(file_name)
    }

    /// Remove the staging area, reporting removal errors.
    pub fn release(self) -> WorkerResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!("Released staging area {}", path.display());
        Ok(())
    }
}
