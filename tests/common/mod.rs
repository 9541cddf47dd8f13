#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use popmap::dataset::{Dataset, NormalizedTable, RawTable};
use tempfile::{TempDir, tempdir};

/// Three countries, two of them in Asia.
pub const THREE_COUNTRIES: &str = "\
Country,Population,Urban (%)
India,1234567,55.5
Japan,123294513,94.3
France,64756584,82.1
";

pub fn dataset_from(text: &str) -> Dataset {
    let raw = RawTable::parse(text, b',').expect("parse csv");
    Dataset::from_table(NormalizedTable::from_raw(&raw).expect("normalize"))
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
